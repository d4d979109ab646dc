//! Scripted quote source.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::{Price, Quote, SourceId};
use crate::error::SourceError;
use crate::port::QuoteSource;

/// One scripted response.
#[derive(Debug, Clone)]
pub enum Step {
    /// Answer with `price` after `delay`.
    Price { price: Price, delay: Duration },
    /// Fail immediately.
    Fail,
    /// Never answer.
    Hang,
}

impl Step {
    pub fn price(price: Price) -> Self {
        Self::Price {
            price,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(price: Price, delay_ms: u64) -> Self {
        Self::Price {
            price,
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn fail() -> Self {
        Self::Fail
    }

    pub fn hang() -> Self {
        Self::Hang
    }
}

/// Quote source that plays back a script per source id.
///
/// Each call consumes the next step for its source; the last step repeats
/// forever. Sources without a script fail.
#[derive(Debug, Default)]
pub struct ScriptedQuoteSource {
    scripts: Mutex<HashMap<SourceId, VecDeque<Step>>>,
    calls: Mutex<Vec<(SourceId, Instant)>>,
}

impl ScriptedQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the script for `source`.
    pub fn script(&self, source: impl Into<SourceId>, steps: impl IntoIterator<Item = Step>) {
        self.scripts
            .lock()
            .insert(source.into(), steps.into_iter().collect());
    }

    /// Script every source in `prices` with a single constant price.
    pub fn script_prices(&self, prices: &[(&str, Price)]) {
        for (source, price) in prices {
            self.script(*source, [Step::price(*price)]);
        }
    }

    /// Total calls across all sources.
    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Calls made for `source`.
    pub fn calls_for(&self, source: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(id, _)| id.as_str() == source)
            .count()
    }

    /// Instants at which `source` was called, oldest first.
    pub fn call_times(&self, source: &str) -> Vec<Instant> {
        self.calls
            .lock()
            .iter()
            .filter(|(id, _)| id.as_str() == source)
            .map(|(_, at)| *at)
            .collect()
    }

    fn next_step(&self, source: &SourceId) -> Option<Step> {
        let mut scripts = self.scripts.lock();
        let steps = scripts.get_mut(source)?;
        if steps.len() > 1 {
            steps.pop_front()
        } else {
            steps.front().cloned()
        }
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuoteSource {
    async fn get_price(&self, source: &SourceId) -> Result<Quote, SourceError> {
        self.calls.lock().push((source.clone(), Instant::now()));

        match self.next_step(source) {
            Some(Step::Price { price, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(Quote::new(source.clone(), price))
            }
            Some(Step::Fail) => Err(SourceError::Unavailable {
                source_id: source.clone(),
                reason: "scripted failure".into(),
            }),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(SourceError::Unavailable {
                source_id: source.clone(),
                reason: "no script".into(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
