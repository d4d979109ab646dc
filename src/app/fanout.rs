//! Concurrent multi-source price acquisition.
//!
//! One attempt issues every source call at once and joins them under a
//! single overall deadline. Any failure or an elapsed deadline fails the
//! attempt as a whole, and the whole fan-out is retried up to the budget.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{Quote, SourceId};
use crate::error::FanoutError;
use crate::port::QuoteSource;

/// Deadline and retry budget for one tick's fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutPolicy {
    /// Overall deadline for one attempt, covering every source.
    pub deadline: Duration,
    /// Extra attempts after the first failure.
    pub max_retries: u32,
}

impl FanoutPolicy {
    /// Total number of attempts, including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for FanoutPolicy {
    fn default() -> Self {
        Self {
            deadline: Duration::from_millis(900),
            max_retries: 2,
        }
    }
}

/// A configured source bound to the implementation that serves it.
#[derive(Clone)]
pub struct SourceBinding {
    pub id: SourceId,
    pub source: Arc<dyn QuoteSource>,
}

impl SourceBinding {
    pub fn new(id: impl Into<SourceId>, source: Arc<dyn QuoteSource>) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

/// Fetches one quote per configured source, concurrently.
pub struct Fanout {
    bindings: Vec<SourceBinding>,
    policy: FanoutPolicy,
}

impl Fanout {
    pub fn new(bindings: Vec<SourceBinding>, policy: FanoutPolicy) -> Self {
        Self { bindings, policy }
    }

    #[must_use]
    pub fn policy(&self) -> FanoutPolicy {
        self.policy
    }

    /// Configured source ids, in order.
    pub fn source_ids(&self) -> impl Iterator<Item = &SourceId> {
        self.bindings.iter().map(|b| &b.id)
    }

    /// Run attempts until one succeeds or the retry budget is spent.
    ///
    /// On success the quotes are in configured source order.
    pub async fn fetch(&self) -> Result<Vec<Quote>, FanoutError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.attempt().await {
                Ok(quotes) => {
                    debug!(attempt, quotes = quotes.len(), "Fan-out completed");
                    return Ok(quotes);
                }
                Err(e) if attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %e, "Fan-out attempt failed, retrying");
                }
                Err(e) => {
                    return Err(FanoutError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }
    }

    /// One attempt: all calls start together; the deadline covers all of
    /// them. Dropping the joined future on timeout cancels pending calls.
    async fn attempt(&self) -> Result<Vec<Quote>, FanoutError> {
        let calls = self.bindings.iter().map(|binding| async move {
            let quote = binding.source.get_price(&binding.id).await?;
            // Keyed by the requested id so samples always match configuration.
            Ok::<_, FanoutError>(Quote::new(binding.id.clone(), quote.price()))
        });

        match timeout(self.policy.deadline, try_join_all(calls)).await {
            Ok(result) => result,
            Err(_) => Err(FanoutError::Timeout {
                deadline: self.policy.deadline,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::source::{ScriptedQuoteSource, Step};
    use rust_decimal_macros::dec;

    fn bindings(source: &Arc<ScriptedQuoteSource>, ids: &[&str]) -> Vec<SourceBinding> {
        ids.iter()
            .map(|id| SourceBinding::new(*id, Arc::clone(source) as Arc<dyn QuoteSource>))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn returns_quotes_in_configured_order() {
        let source = Arc::new(ScriptedQuoteSource::new());
        // Slowest answers first in configured order.
        source.script("A", [Step::delayed(dec!(100), 300)]);
        source.script("B", [Step::delayed(dec!(101), 200)]);
        source.script("C", [Step::delayed(dec!(99), 100)]);

        let fanout = Fanout::new(bindings(&source, &["A", "B", "C"]), FanoutPolicy::default());
        let quotes = fanout.fetch().await.unwrap();

        let order: Vec<_> = quotes.iter().map(|q| q.source().as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(quotes[2].price(), dec!(99));
    }

    #[tokio::test(start_paused = true)]
    async fn calls_run_concurrently_within_deadline() {
        let source = Arc::new(ScriptedQuoteSource::new());
        for id in ["A", "B", "C", "D"] {
            source.script(id, [Step::delayed(dec!(100), 600)]);
        }

        let fanout = Fanout::new(
            bindings(&source, &["A", "B", "C", "D"]),
            FanoutPolicy::default(),
        );

        let start = tokio::time::Instant::now();
        fanout.fetch().await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(900));
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_whole_fanout_after_source_error() {
        let source = Arc::new(ScriptedQuoteSource::new());
        source.script("A", [Step::price(dec!(100)), Step::price(dec!(100))]);
        source.script("B", [Step::fail(), Step::price(dec!(101))]);

        let fanout = Fanout::new(bindings(&source, &["A", "B"]), FanoutPolicy::default());
        let quotes = fanout.fetch().await.unwrap();

        assert_eq!(quotes[1].price(), dec!(101));
        assert_eq!(source.calls_for("A"), 2);
        assert_eq!(source.calls_for("B"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_three_timeouts() {
        let source = Arc::new(ScriptedQuoteSource::new());
        source.script("A", [Step::price(dec!(100))]);
        source.script("B", [Step::hang()]);

        let fanout = Fanout::new(bindings(&source, &["A", "B"]), FanoutPolicy::default());
        let err = fanout.fetch().await.unwrap_err();

        match err {
            FanoutError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FanoutError::Timeout { .. }));
            }
            other => panic!("expected exhausted, got {other:?}"),
        }
        assert_eq!(source.calls_for("B"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let source = Arc::new(ScriptedQuoteSource::new());
        source.script("A", [Step::fail()]);
        source.script("B", [Step::price(dec!(1))]);

        let policy = FanoutPolicy {
            max_retries: 0,
            ..Default::default()
        };
        let fanout = Fanout::new(bindings(&source, &["A", "B"]), policy);

        let err = fanout.fetch().await.unwrap_err();
        assert!(matches!(err, FanoutError::Exhausted { attempts: 1, .. }));
        assert_eq!(source.calls_for("A"), 1);
    }
}
