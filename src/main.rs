use anyhow::Context;
use log::{debug, error, info};

use consultant_store::config::{self, DbConfig};
use consultant_store::error::ConfigError;
use consultant_store::logging::init_logging;
use consultant_store::model::sample_consultants;
use consultant_store::runner::{connector_for, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Before the logger, so RUST_LOG may come from .env too.
    let dotenv = config::load_dotenv();
    init_logging().context("failed to install logger")?;
    if let Some(path) = dotenv {
        debug!("environment loaded from {}", path.display());
    }

    let config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(err @ ConfigError::Missing(_)) => {
            debug!("{err}");
            for line in config::usage_hint() {
                info!("{line}");
            }
            return Ok(());
        }
        Err(err) => {
            error!("Error: {err}");
            return Ok(());
        }
    };
    debug!("configuration: {config:?}");

    let report = run(&config, connector_for(config.backend), &sample_consultants()).await;
    debug!(
        "run finished: connected={} table_ready={} inserted={} closed={}",
        report.connected,
        report.table_ready,
        report.inserted_ids().len(),
        report.closed
    );
    Ok(())
}
