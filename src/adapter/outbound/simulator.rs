//! Simulated quote source.
//!
//! Produces a uniformly random price in `[base_price, base_price + jitter)`
//! with optional latency and failure injection, so the whole pipeline
//! (including timeouts and retries) can run without a market data feed.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::trace;

use crate::domain::{Price, Quote, SourceId};
use crate::error::SourceError;
use crate::port::QuoteSource;

/// Resolution of the random offset (1/10_000 of `jitter`).
const JITTER_STEPS: u32 = 10_000;

/// Configuration for the simulated feed.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    /// Lowest price the simulator reports
    #[serde(default = "default_base_price")]
    pub base_price: Price,

    /// Width of the random band above `base_price`
    #[serde(default = "default_jitter")]
    pub jitter: Price,

    /// Artificial response latency in milliseconds
    #[serde(default)]
    pub latency_ms: u64,

    /// Probability in [0, 1] that a call fails
    #[serde(default)]
    pub failure_rate: f64,
}

fn default_base_price() -> Price {
    Decimal::new(140, 0)
}

fn default_jitter() -> Price {
    Decimal::new(4, 1) // 0.4
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
            jitter: default_jitter(),
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

/// Quote source backed by a random number generator.
#[derive(Debug, Clone)]
pub struct SimulatedQuoteSource {
    base_price: Price,
    jitter: Price,
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedQuoteSource {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            base_price: config.base_price,
            jitter: config.jitter,
            latency: Duration::from_millis(config.latency_ms),
            failure_rate: config.failure_rate.clamp(0.0, 1.0),
        }
    }

    fn draw(&self) -> Option<Price> {
        let mut rng = rand::thread_rng();
        if self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate) {
            return None;
        }
        let step = rng.gen_range(0..JITTER_STEPS);
        let offset = self.jitter * Decimal::from(step) / Decimal::from(JITTER_STEPS);
        Some((self.base_price + offset).round_dp(4))
    }
}

#[async_trait]
impl QuoteSource for SimulatedQuoteSource {
    async fn get_price(&self, source: &SourceId) -> Result<Quote, SourceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.draw() {
            Some(price) => {
                trace!(source = %source, price = %price, "Simulated quote");
                Ok(Quote::new(source.clone(), price))
            }
            None => Err(SourceError::Unavailable {
                source_id: source.clone(),
                reason: "simulated outage".into(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "simulator"
    }
}
