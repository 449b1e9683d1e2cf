mod config;
mod scheduler;
mod prober;

use config::{LogFormat, PollerConfig};
use scheduler::Scheduler;
use prober::http::HttpProber;
use prober::{tick, HEALTH_URL, PROBE_INTERVAL_MS};

use std::io;
use tracing::{debug, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load config first to get log level
    let (config, config_file) = PollerConfig::from_env().await?;
    let log_level = config.get_tracing_level()?;

    // stdout carries outcome lines only; diagnostics go to stderr
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("health_poller={}", log_level.as_str().to_lowercase()).parse()?);
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }

    match config_file {
        Some(path) => info!("loaded config from {}", path),
        None => debug!("no config file, using defaults"),
    }

    let prober = HttpProber::new(HEALTH_URL)?;
    let scheduler = Scheduler::new(PROBE_INTERVAL_MS)?;
    info!("polling {} every {:?}", prober.url(), scheduler.interval());

    let prober = &prober;
    scheduler
        .run(move || async move { tick(prober, &mut io::stdout()).await })
        .await?;

    Ok(())
}
