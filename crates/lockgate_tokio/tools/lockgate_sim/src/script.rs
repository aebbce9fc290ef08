//! Script grammar, one command per line:
//!
//! ```text
//! launch | background | foreground | unlock
//! pref on|off
//! auth success|deny|unavailable|hang
//! wait <ms>
//! expect <state>
//! ```
//!
//! `#` starts a comment; blank lines are ignored.

use std::time::Duration;

use lockgate_core::gate::{LifecycleEvent, StateKind};
use thiserror::Error;

/// How the simulated authenticator answers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AuthMode {
    Success,
    Deny,
    Unavailable,
    /// Never completes, like a dismissed system prompt that never reports back.
    Hang,
}

impl AuthMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "success" | "ok" => Some(AuthMode::Success),
            "deny" | "denied" => Some(AuthMode::Deny),
            "unavailable" => Some(AuthMode::Unavailable),
            "hang" => Some(AuthMode::Hang),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    Lifecycle(LifecycleEvent),
    Unlock,
    Pref(bool),
    Auth(AuthMode),
    Wait(Duration),
    Expect(StateKind),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut out = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let mut words = content.split_whitespace();
        let verb = words.next().unwrap_or("").to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(err(line, "too many arguments"));
        }

        let command = match (verb.as_str(), arg) {
            ("launch", None) => Command::Lifecycle(LifecycleEvent::LaunchCompleted),
            ("background", None) => Command::Lifecycle(LifecycleEvent::EnteredBackground),
            ("foreground", None) => Command::Lifecycle(LifecycleEvent::EnteredForeground),
            ("unlock", None) => Command::Unlock,
            ("pref", Some(value)) => match value.to_ascii_lowercase().as_str() {
                "on" | "true" => Command::Pref(true),
                "off" | "false" => Command::Pref(false),
                other => return Err(err(line, format!("pref expects on|off, got `{other}`"))),
            },
            ("auth", Some(value)) => AuthMode::parse(value)
                .map(Command::Auth)
                .ok_or_else(|| err(line, format!("unknown auth mode `{value}`")))?,
            ("wait", Some(value)) => value
                .parse()
                .map(|ms| Command::Wait(Duration::from_millis(ms)))
                .map_err(|_| err(line, format!("wait expects milliseconds, got `{value}`")))?,
            ("expect", Some(value)) => StateKind::from_label(value)
                .map(Command::Expect)
                .ok_or_else(|| err(line, format!("unknown state `{value}`")))?,
            ("pref" | "auth" | "wait" | "expect", None) => {
                return Err(err(line, format!("`{verb}` needs an argument")))
            }
            (_, Some(_)) if is_bare(&verb) => {
                return Err(err(line, format!("`{verb}` takes no argument")))
            }
            _ => return Err(err(line, format!("unknown command `{verb}`"))),
        };

        out.push(ScriptLine { line, command });
    }

    Ok(out)
}

fn is_bare(verb: &str) -> bool {
    matches!(verb, "launch" | "background" | "foreground" | "unlock")
}

fn err(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError {
        line,
        message: message.into(),
    }
}
