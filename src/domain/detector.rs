//! Spread detection across a completed set of quotes.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::id::SourceId;
use super::money::{Percent, Price};
use super::quote::Quote;

/// Configuration for the spread detector
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Spread in percent that must be exceeded to flag an opportunity
    #[serde(default = "default_threshold_pct")]
    pub threshold_pct: Percent,
}

fn default_threshold_pct() -> Percent {
    Decimal::new(5, 2) // 0.05
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold_pct: default_threshold_pct(),
        }
    }
}

/// Best and worst quote of a tick with their relative spread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spread {
    pub high_source: SourceId,
    pub high_price: Price,
    pub low_source: SourceId,
    pub low_price: Price,
    pub spread_pct: Percent,
}

/// Outcome of classifying one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadReading {
    /// Spread strictly above the threshold.
    Opportunity(Spread),
    /// Spread computed but not above the threshold.
    BelowThreshold(Spread),
    /// Lowest price is zero or negative; no spread is computed.
    Undefined { low_source: SourceId, low_price: Price },
    /// The spread does not fit in a decimal.
    Overflow {
        high_source: SourceId,
        low_source: SourceId,
    },
    /// Fewer than two quotes.
    Insufficient { quotes: usize },
}

impl SpreadReading {
    #[must_use]
    pub fn is_opportunity(&self) -> bool {
        matches!(self, Self::Opportunity(_))
    }

    /// The computed spread, if any.
    #[must_use]
    pub fn spread(&self) -> Option<&Spread> {
        match self {
            Self::Opportunity(spread) | Self::BelowThreshold(spread) => Some(spread),
            Self::Undefined { .. } | Self::Overflow { .. } | Self::Insufficient { .. } => None,
        }
    }
}

/// Ranks quotes and classifies their spread against a threshold.
#[derive(Debug, Clone)]
pub struct SpreadDetector {
    threshold_pct: Percent,
}

impl SpreadDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            threshold_pct: config.threshold_pct,
        }
    }

    #[must_use]
    pub fn threshold_pct(&self) -> Percent {
        self.threshold_pct
    }

    /// Classify a tick's quotes. Pure: the input is never reordered.
    #[must_use]
    pub fn classify(&self, quotes: &[Quote]) -> SpreadReading {
        if quotes.len() < 2 {
            return SpreadReading::Insufficient {
                quotes: quotes.len(),
            };
        }

        let mut ranked: Vec<&Quote> = quotes.iter().collect();
        // Stable sort: equal prices keep configured order.
        ranked.sort_by(|a, b| b.price().cmp(&a.price()));

        let (highest, lowest) = match (ranked.first(), ranked.last()) {
            (Some(h), Some(l)) => (*h, *l),
            _ => {
                return SpreadReading::Insufficient {
                    quotes: quotes.len(),
                }
            }
        };

        if lowest.price() <= Decimal::ZERO {
            return SpreadReading::Undefined {
                low_source: lowest.source().clone(),
                low_price: lowest.price(),
            };
        }

        let spread_pct = match highest
            .price()
            .checked_sub(lowest.price())
            .and_then(|diff| diff.checked_div(lowest.price()))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        {
            Some(pct) => pct,
            None => {
                return SpreadReading::Overflow {
                    high_source: highest.source().clone(),
                    low_source: lowest.source().clone(),
                }
            }
        };

        let spread = Spread {
            high_source: highest.source().clone(),
            high_price: highest.price(),
            low_source: lowest.source().clone(),
            low_price: lowest.price(),
            spread_pct,
        };

        if spread_pct > self.threshold_pct {
            SpreadReading::Opportunity(spread)
        } else {
            SpreadReading::BelowThreshold(spread)
        }
    }
}
