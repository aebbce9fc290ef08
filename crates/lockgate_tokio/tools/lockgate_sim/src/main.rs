use std::io::Read;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lockgate_sim::config::Config;
use lockgate_sim::script::parse_script;
use lockgate_sim::sim::Simulation;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_args();

    let text = match &config.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read script from stdin")?;
            buf
        }
    };
    let script = parse_script(&text).context("parse script")?;

    info!(
        gate = %config.gate_name,
        lock = config.lock_enabled,
        auth = ?config.auth,
        latency_ms = config.latency.as_millis() as u64,
        commands = script.len(),
        "simulation started"
    );

    let mut sim = Simulation::new(&config)?;
    let status = sim.run(&script).await?;

    info!(
        state = status.label,
        flights = status.flights_issued,
        failure = ?status.last_failure,
        "simulation finished"
    );
    Ok(())
}
