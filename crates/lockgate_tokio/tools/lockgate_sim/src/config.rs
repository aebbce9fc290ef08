use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::script::AuthMode;

pub const DEFAULT_GATE_NAME: &str = "sim-window";
pub const DEFAULT_LATENCY_MS: u64 = 150;
pub const DEFAULT_DISSOLVE_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
    pub gate_name: String,
    pub lock_enabled: bool,
    pub auth: AuthMode,
    pub latency: Duration,
    pub dissolve: Duration,
    /// Script file; stdin when absent.
    pub script: Option<PathBuf>,
}

impl Config {
    pub fn from_args() -> Self {
        Self::from_args_iter(env::args())
    }

    pub fn from_args_iter<I, S>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut gate_name = DEFAULT_GATE_NAME.to_string();
        let mut lock_enabled = env::var("LOCKGATE_LOCK")
            .ok()
            .and_then(parse_bool)
            .unwrap_or(true);
        let mut auth = env::var("LOCKGATE_AUTH")
            .ok()
            .and_then(|v| AuthMode::parse(&v))
            .unwrap_or(AuthMode::Success);
        let mut latency_ms = env::var("LOCKGATE_AUTH_LATENCY_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_LATENCY_MS);
        let mut dissolve_ms = env::var("LOCKGATE_DISSOLVE_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_DISSOLVE_MS);
        let mut script = None;

        let mut args = iter.into_iter();
        let _ = args.next();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            match arg {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--lock" => lock_enabled = true,
                "--no-lock" => lock_enabled = false,
                "--gate-name" => {
                    if let Some(value) = args.next() {
                        gate_name = value.as_ref().to_string();
                    }
                }
                "--auth" => {
                    if let Some(mode) = args.next().and_then(|v| AuthMode::parse(v.as_ref())) {
                        auth = mode;
                    }
                }
                "--latency-ms" => {
                    if let Some(ms) = args.next().and_then(|v| v.as_ref().parse().ok()) {
                        latency_ms = ms;
                    }
                }
                "--dissolve-ms" => {
                    if let Some(ms) = args.next().and_then(|v| v.as_ref().parse().ok()) {
                        dissolve_ms = ms;
                    }
                }
                "--script" => {
                    if let Some(value) = args.next() {
                        script = Some(PathBuf::from(value.as_ref()));
                    }
                }
                _ if arg.starts_with("--gate-name=") => {
                    gate_name = arg["--gate-name=".len()..].to_string();
                }
                _ if arg.starts_with("--auth=") => {
                    if let Some(mode) = AuthMode::parse(&arg["--auth=".len()..]) {
                        auth = mode;
                    }
                }
                _ if arg.starts_with("--latency-ms=") => {
                    if let Ok(ms) = arg["--latency-ms=".len()..].parse() {
                        latency_ms = ms;
                    }
                }
                _ if arg.starts_with("--dissolve-ms=") => {
                    if let Ok(ms) = arg["--dissolve-ms=".len()..].parse() {
                        dissolve_ms = ms;
                    }
                }
                _ if arg.starts_with("--script=") => {
                    script = Some(PathBuf::from(&arg["--script=".len()..]));
                }
                _ => {}
            }
        }

        Self {
            gate_name,
            lock_enabled,
            auth,
            latency: Duration::from_millis(latency_ms),
            dissolve: Duration::from_millis(dissolve_ms),
            script,
        }
    }
}

fn print_usage() {
    println!(
        "lockgate_sim [--lock|--no-lock] [--auth success|deny|unavailable|hang] [--latency-ms <n>] [--dissolve-ms <n>] [--gate-name <name>] [--script <path>]"
    );
}

fn parse_bool(value: String) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
