use std::sync::Arc;
use std::time::Duration;

use spreadwatch::app::{Fanout, FanoutPolicy, Scheduler, SourceBinding};
use spreadwatch::domain::{DetectorConfig, HistoryConfig, HistoryStore, SpreadDetector};
use spreadwatch::port::{QuoteSource, TradeLog};
use spreadwatch::testkit::source::ScriptedQuoteSource;
use spreadwatch::testkit::trade_log::RecordingTradeLog;

pub const SOURCES: [&str; 4] = ["A", "B", "C", "D"];

/// Scheduler over four scripted sources with reference settings.
pub struct Pipeline {
    pub source: Arc<ScriptedQuoteSource>,
    pub log: Arc<RecordingTradeLog>,
    pub scheduler: Scheduler,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_history(HistoryConfig::default())
    }

    pub fn with_history(history: HistoryConfig) -> Self {
        let source = Arc::new(ScriptedQuoteSource::new());
        let log = Arc::new(RecordingTradeLog::new());
        let bindings = SOURCES
            .iter()
            .map(|id| SourceBinding::new(*id, Arc::clone(&source) as Arc<dyn QuoteSource>))
            .collect();

        let scheduler = Scheduler::new(
            Fanout::new(bindings, FanoutPolicy::default()),
            SpreadDetector::new(&DetectorConfig::default()),
            Arc::new(HistoryStore::new(&history)),
            Arc::clone(&log) as Arc<dyn TradeLog>,
            Duration::from_secs(1),
        );

        Self {
            source,
            log,
            scheduler,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        self.scheduler.history()
    }
}
