use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use lockgate_core::gate::{AuthError, AuthOutcome, CurtainTransition, GateState};
use lockgate_tokio::error::log_core_error;
use lockgate_tokio::gate::{
    AuthFuture, AuthGate, Authenticator, Curtain, GateConfig, GateStatus, SharedPreference,
};
use tracing::info;

use crate::config::Config;
use crate::script::{AuthMode, Command, ScriptLine};

/// Authenticator whose answer is set by the script.
pub struct ScriptedAuthenticator {
    mode: Mutex<AuthMode>,
    latency: Duration,
}

impl ScriptedAuthenticator {
    pub fn new(mode: AuthMode, latency: Duration) -> Self {
        Self {
            mode: Mutex::new(mode),
            latency,
        }
    }

    pub fn set_mode(&self, mode: AuthMode) {
        *self.mode.lock().unwrap_or_else(|poison| poison.into_inner()) = mode;
    }

    fn mode(&self) -> AuthMode {
        *self.mode.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Authenticator for ScriptedAuthenticator {
    fn availability(&self) -> AuthOutcome {
        match self.mode() {
            AuthMode::Unavailable => Err(AuthError::Unavailable),
            _ => Ok(()),
        }
    }

    fn authenticate(&self) -> AuthFuture {
        let latency = self.latency;
        let outcome: AuthOutcome = match self.mode() {
            AuthMode::Success => Ok(()),
            AuthMode::Deny => Err(AuthError::Denied),
            AuthMode::Unavailable => Err(AuthError::Unavailable),
            AuthMode::Hang => return Box::pin(std::future::pending::<AuthOutcome>()),
        };
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            outcome
        })
    }
}

/// Curtain that only logs what a real overlay would do.
pub struct LoggingCurtain {
    dissolve: Duration,
    up: AtomicBool,
}

impl LoggingCurtain {
    pub fn new(dissolve: Duration) -> Self {
        Self {
            dissolve,
            up: AtomicBool::new(false),
        }
    }

    pub fn is_up(&self) -> bool {
        self.up.load(Ordering::Acquire)
    }
}

impl Curtain for LoggingCurtain {
    fn show(&self) {
        if !self.up.swap(true, Ordering::AcqRel) {
            info!("curtain raised");
        }
    }

    fn hide(&self, transition: CurtainTransition) {
        if self.up.swap(false, Ordering::AcqRel) {
            match transition {
                CurtainTransition::Immediate => info!("curtain removed"),
                CurtainTransition::CrossDissolve => {
                    info!(dissolve_ms = self.dissolve.as_millis() as u64, "curtain dissolving")
                }
            }
        }
    }

    fn set_unlock_enabled(&self, enabled: bool) {
        info!(enabled, "unlock affordance");
    }
}

/// One gate plus the simulated collaborators the script controls.
pub struct Simulation {
    gate: AuthGate,
    auth: Arc<ScriptedAuthenticator>,
    curtain: Arc<LoggingCurtain>,
    pref: SharedPreference,
}

impl Simulation {
    pub fn new(config: &Config) -> Result<Self> {
        let auth = Arc::new(ScriptedAuthenticator::new(config.auth, config.latency));
        let curtain = Arc::new(LoggingCurtain::new(config.dissolve));
        let pref = SharedPreference::new(config.lock_enabled);

        let gate = AuthGate::new(
            curtain.clone(),
            auth.clone(),
            Arc::new(pref.clone()),
            GateConfig::named(config.gate_name.clone()),
        )
        .context("create gate")?;

        Ok(Self {
            gate,
            auth,
            curtain,
            pref,
        })
    }

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn status(&self) -> GateStatus {
        self.gate.status()
    }

    pub fn curtain_up(&self) -> bool {
        self.curtain.is_up()
    }

    /// Execute every line; fails on the first unmet `expect`.
    pub async fn run(&mut self, script: &[ScriptLine]) -> Result<GateStatus> {
        for line in script {
            self.execute(line).await?;
        }
        self.gate.drain_results();
        Ok(self.gate.status())
    }

    async fn execute(&mut self, line: &ScriptLine) -> Result<()> {
        match line.command {
            Command::Lifecycle(event) => {
                if let Err(err) = self.gate.on_lifecycle(event) {
                    log_core_error(err);
                }
            }
            Command::Unlock => {
                if let Err(err) = self.gate.request_unlock() {
                    log_core_error(err);
                }
            }
            Command::Pref(enabled) => {
                info!(enabled, "lock preference changed");
                self.pref.set(enabled);
            }
            Command::Auth(mode) => self.auth.set_mode(mode),
            Command::Wait(duration) => self.settle_for(duration).await,
            Command::Expect(kind) => {
                self.gate.drain_results();
                let state = self.gate.state();
                if state.kind() != kind {
                    bail!(
                        "line {}: expected {}, gate is {}",
                        line.line,
                        kind.label(),
                        state.label()
                    );
                }
            }
        }
        Ok(())
    }

    /// Apply authenticator results as they arrive, for `duration`.
    async fn settle_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        while tokio::time::timeout_at(deadline, self.gate.next_result())
            .await
            .is_ok()
        {}
    }
}
