//! Application orchestration.
//!
//! Wires configuration, adapters and the scheduler together and owns the
//! process lifecycle: bind the dashboard, run the scheduler until the
//! shutdown signal, then stop the dashboard and release its socket.

pub mod config;
pub mod factory;
pub mod fanout;
pub mod scheduler;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use crate::adapter::inbound::dashboard::{Dashboard, DashboardState};
use crate::domain::HistoryStore;
use crate::error::Result;

pub use config::Config;
pub use fanout::{Fanout, FanoutPolicy, SourceBinding};
pub use scheduler::{RunSummary, Scheduler, TickOutcome};

/// Main application struct.
pub struct App;

impl App {
    /// Run until `shutdown` resolves.
    ///
    /// Failing to bind the dashboard is the only fatal error; everything
    /// that goes wrong inside a tick is logged and the loop continues.
    pub async fn run<F>(config: Config, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        let history = Arc::new(HistoryStore::new(&config.history));
        let sources = factory::build_sources(&config);
        let trade_log = factory::build_trade_log(&config);
        let scheduler = factory::build_scheduler(&config, sources, trade_log, Arc::clone(&history));

        let (stop_tx, stop_rx) = watch::channel(false);

        let server = if config.dashboard.enabled {
            let state = DashboardState {
                history: Arc::clone(&history),
                instrument: Arc::from(config.instrument.as_str()),
                sources: Arc::from(config.source_ids()),
                refresh_ms: config.dashboard.refresh_ms,
            };
            let dashboard = Dashboard::bind(&config.dashboard, state).await?;
            info!(url = %format!("http://{}", dashboard.local_addr()?), "Dashboard ready");
            Some(tokio::spawn(dashboard.serve(wait_for_stop(stop_rx))))
        } else {
            info!("Dashboard disabled");
            None
        };

        info!(
            instrument = %config.instrument,
            trade_log = %config.trade_log.path.display(),
            "Sampling started"
        );

        let summary = scheduler.run(shutdown).await;

        let _ = stop_tx.send(true);
        if let Some(server) = server {
            match server.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Dashboard failed"),
                Err(e) => error!(error = %e, "Dashboard task panicked"),
            }
        }

        Ok(summary)
    }
}

async fn wait_for_stop(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}
