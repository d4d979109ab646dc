//! Fixed-cadence driver of the sampling pipeline.
//!
//! Each tick runs fan-out, detection, history update and (for
//! opportunities) persistence in sequence. Ticks never overlap: the next
//! tick starts no earlier than one cadence after the previous start, and
//! never before the previous tick has finished.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::fanout::Fanout;
use crate::domain::{HistoryStore, OpportunityEvent, Sample, SpreadDetector, SpreadReading};
use crate::error::FanoutError;
use crate::port::TradeLog;

/// What a single tick produced.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Sample recorded, no opportunity.
    Sampled { reading: SpreadReading },
    /// Sample and opportunity recorded. `persisted` is false when the
    /// trade log rejected the record.
    Opportunity {
        event: OpportunityEvent,
        persisted: bool,
    },
    /// Every fan-out attempt failed; nothing was recorded.
    Abandoned { error: FanoutError },
}

/// Counters over a scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub sampled: u64,
    pub opportunities: u64,
    pub abandoned: u64,
    pub persistence_failures: u64,
}

impl RunSummary {
    fn observe(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        match outcome {
            TickOutcome::Sampled { .. } => self.sampled += 1,
            TickOutcome::Opportunity { persisted, .. } => {
                self.opportunities += 1;
                if !persisted {
                    self.persistence_failures += 1;
                }
            }
            TickOutcome::Abandoned { .. } => self.abandoned += 1,
        }
    }
}

/// Owns the pipeline and the single write handle to the history.
pub struct Scheduler {
    fanout: Fanout,
    detector: SpreadDetector,
    history: Arc<HistoryStore>,
    trade_log: Arc<dyn TradeLog>,
    cadence: Duration,
}

impl Scheduler {
    pub fn new(
        fanout: Fanout,
        detector: SpreadDetector,
        history: Arc<HistoryStore>,
        trade_log: Arc<dyn TradeLog>,
        cadence: Duration,
    ) -> Self {
        Self {
            fanout,
            detector,
            history,
            trade_log,
            cadence,
        }
    }

    #[must_use]
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    #[must_use]
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Cadence in whole milliseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn cadence_ms(&self) -> u64 {
        u64::try_from(self.cadence.as_millis()).unwrap_or(u64::MAX)
    }

    /// Run one tick. Never fails: every error is recovered and logged here.
    pub async fn tick(&self) -> TickOutcome {
        let quotes = match self.fanout.fetch().await {
            Ok(quotes) => quotes,
            Err(error) => {
                warn!(error = %error, "Tick abandoned");
                return TickOutcome::Abandoned { error };
            }
        };

        let timestamp = Utc::now();
        let reading = self.detector.classify(&quotes);
        let sample = Sample::from_quotes(timestamp, &quotes);

        let spread = match reading {
            SpreadReading::Opportunity(spread) => spread,
            other => {
                match &other {
                    SpreadReading::Undefined {
                        low_source,
                        low_price,
                    } => {
                        warn!(low = %low_source, price = %low_price, "Non-positive price, spread undefined");
                    }
                    SpreadReading::Overflow {
                        high_source,
                        low_source,
                    } => {
                        warn!(high = %high_source, low = %low_source, "Spread out of decimal range");
                    }
                    SpreadReading::BelowThreshold(spread) => {
                        debug!(
                            high = %spread.high_source,
                            low = %spread.low_source,
                            spread_pct = %spread.spread_pct.round_dp(4),
                            "Spread below threshold"
                        );
                    }
                    _ => {}
                }
                self.history.record(sample, None);
                return TickOutcome::Sampled { reading: other };
            }
        };

        let event = OpportunityEvent::new(
            timestamp,
            spread.high_source,
            spread.low_source,
            spread.spread_pct,
        );
        let record = event.record();

        info!(
            high = %event.high_source(),
            low = %event.low_source(),
            high_price = %spread.high_price,
            low_price = %spread.low_price,
            spread_pct = %event.spread_pct().round_dp(4),
            "PROFIT"
        );

        // In-memory history first; a failed write never rolls it back.
        self.history.record(sample, Some(event.clone()));

        let persisted = match self.trade_log.append(&record).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, record = %record, sink = self.trade_log.name(), "Failed to persist opportunity");
                false
            }
        };

        TickOutcome::Opportunity { event, persisted }
    }

    /// Tick on the cadence until `shutdown` resolves.
    ///
    /// A tick in progress always completes before shutdown is observed.
    pub async fn run<F>(&self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let mut summary = RunSummary::default();
        let mut ticker = interval(self.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            cadence_ms = self.cadence_ms(),
            sources = self.fanout.source_ids().count(),
            threshold_pct = %self.detector.threshold_pct(),
            "Scheduler started"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            let outcome = self.tick().await;
            summary.observe(&outcome);
            debug!(
                tick = summary.ticks,
                samples = self.history.sample_count(),
                opportunities = self.history.opportunity_count(),
                "Tick finished"
            );
        }

        info!(
            ticks = summary.ticks,
            opportunities = summary.opportunities,
            abandoned = summary.abandoned,
            "Scheduler stopped"
        );
        summary
    }
}
