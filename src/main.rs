mod blackboard;
mod config;
mod sim;

use std::sync::Arc;
use std::time::Duration;

use blackboard::Blackboard;
use config::DEFAULT_CONFIG_PATH;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Strafe odometry simulation started.");

    let path = std::env::var("STRAFE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = config::load_config(&path)?;

    match run(config).await {
        Ok(()) => {
            info!("Simulation finished successfully.");
            Ok(())
        }
        Err(e) => {
            error!("Simulation failed: {:?}", e);
            Err(e)
        }
    }
}

async fn run(config: config::SimConfig) -> anyhow::Result<()> {
    let bb: Blackboard = Arc::default();
    let telemetry_period = Duration::from_secs_f64(config.run.telemetry_period_s);

    let (summary, ()) = tokio::try_join!(
        sim::control_loop(config, bb.clone()),
        sim::telemetry(bb.clone(), telemetry_period),
    )?;

    info!(
        ticks = summary.ticks,
        mean_error = summary.mean_error,
        max_error = summary.max_error,
        heading_error = summary.final_heading_error,
        estimate = %summary.final_estimate,
        truth = %summary.final_truth,
        "Run summary"
    );

    let faults = blackboard::snapshot(&bb).faults;
    if !faults.is_empty() {
        warn!(?faults, "Faults raised during the run.");
    }
    Ok(())
}
