//! Construction of pipeline components from configuration.

use std::sync::Arc;

use super::config::Config;
use super::fanout::{Fanout, FanoutPolicy, SourceBinding};
use super::scheduler::Scheduler;
use crate::adapter::outbound::{FileTradeLog, SimulatedQuoteSource};
use crate::domain::{HistoryStore, SpreadDetector};
use crate::port::{QuoteSource, TradeLog};

/// Fan-out policy from the sampler settings.
#[must_use]
pub fn fanout_policy(config: &Config) -> FanoutPolicy {
    FanoutPolicy {
        deadline: config.sampler.deadline(),
        max_retries: config.sampler.max_retries,
    }
}

/// Bind every configured source to the simulated feed.
pub fn build_sources(config: &Config) -> Vec<SourceBinding> {
    let simulator: Arc<dyn QuoteSource> = Arc::new(SimulatedQuoteSource::new(&config.simulator));
    bind_sources(config, simulator)
}

/// Bind every configured source, in order, to `source`.
pub fn bind_sources(config: &Config, source: Arc<dyn QuoteSource>) -> Vec<SourceBinding> {
    config
        .sources
        .iter()
        .map(|s| SourceBinding::new(s.id.clone(), Arc::clone(&source)))
        .collect()
}

/// File trade log at the configured path.
pub fn build_trade_log(config: &Config) -> Arc<dyn TradeLog> {
    Arc::new(FileTradeLog::from_config(&config.trade_log))
}

/// Assemble a scheduler around already-built collaborators.
pub fn build_scheduler(
    config: &Config,
    sources: Vec<SourceBinding>,
    trade_log: Arc<dyn TradeLog>,
    history: Arc<HistoryStore>,
) -> Scheduler {
    Scheduler::new(
        Fanout::new(sources, fanout_policy(config)),
        SpreadDetector::new(&config.detector),
        history,
        trade_log,
        config.sampler.cadence(),
    )
}
