//! Handler for the `run` command.

use tokio::signal;
use tracing::info;

use crate::app::{App, Config};
use crate::cli::RunArgs;
use crate::error::Result;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let (mut config, loaded) = Config::load_or_default(&args.config)?;

    // Apply CLI overrides
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(threshold) = args.threshold {
        config.detector.threshold_pct = threshold;
    }
    if let Some(ref bind) = args.bind {
        config.dashboard.bind = bind.clone();
    }
    if args.no_dashboard {
        config.dashboard.enabled = false;
    }
    if let Some(ref path) = args.trade_log {
        config.trade_log.path = path.clone();
    }
    config.validate()?;

    config.init_logging();

    if loaded {
        info!(config = %args.config.display(), "Configuration loaded");
    } else {
        info!(config = %args.config.display(), "No configuration file, using defaults");
    }
    info!(
        sources = ?config.source_ids().iter().map(ToString::to_string).collect::<Vec<_>>(),
        threshold_pct = %config.detector.threshold_pct,
        "spreadwatch starting"
    );

    App::run(config, async {
        let _ = signal::ctrl_c().await;
        info!("Shutdown signal received");
    })
    .await?;

    info!("spreadwatch stopped");
    Ok(())
}
