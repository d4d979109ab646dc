//! HTTP dashboard over the shared history store.
//!
//! Serves a self-refreshing HTML page at `/` and a JSON snapshot at
//! `/api/history`. Every request takes one consistent snapshot of the
//! store; nothing here ever writes to it.

mod page;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::domain::{HistoryStore, OpportunityEvent, Sample, SourceId};
use crate::error::{Error, Result};

pub use page::render_page;

/// Dashboard listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Page auto-reload interval in milliseconds
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}

fn default_refresh_ms() -> u64 {
    1_000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            bind: default_bind(),
            refresh_ms: default_refresh_ms(),
        }
    }
}

/// State shared by all dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub history: Arc<HistoryStore>,
    pub instrument: Arc<str>,
    pub sources: Arc<[SourceId]>,
    pub refresh_ms: u64,
}

/// JSON body of `GET /api/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub instrument: String,
    pub sources: Vec<SourceId>,
    pub samples: Vec<Sample>,
    pub opportunities: Vec<OpportunityEvent>,
    pub opportunity_count: usize,
}

/// Build the dashboard router.
pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/history", get(history))
        .with_state(state)
}

async fn index(State(state): State<DashboardState>) -> Html<String> {
    let snapshot = state.history.snapshot();
    Html(render_page(
        &state.instrument,
        &state.sources,
        &snapshot,
        state.refresh_ms,
    ))
}

async fn history(State(state): State<DashboardState>) -> Json<HistoryResponse> {
    let snapshot = state.history.snapshot();
    let opportunity_count = snapshot.opportunity_count();
    Json(HistoryResponse {
        instrument: state.instrument.to_string(),
        sources: state.sources.to_vec(),
        samples: snapshot.samples,
        opportunities: snapshot.opportunities,
        opportunity_count,
    })
}

/// A dashboard whose listening socket is already bound.
///
/// Binding happens before the scheduler starts so a taken port is a
/// startup failure rather than a background error.
pub struct Dashboard {
    listener: TcpListener,
    router: Router,
}

impl Dashboard {
    pub async fn bind(config: &DashboardConfig, state: DashboardState) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind)
            .await
            .map_err(|source| Error::Bind {
                addr: config.bind.clone(),
                source,
            })?;

        Ok(Self {
            listener,
            router: router(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then drain and close the socket.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!(addr = %addr, "Dashboard listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Dashboard stopped");
        Ok(())
    }
}
