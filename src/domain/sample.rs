//! One tick's complete set of quotes.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::id::SourceId;
use super::money::Price;
use super::opportunity::local_time;
use super::quote::Quote;

/// Prices of every configured source for one tick, in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    timestamp: DateTime<Utc>,
    prices: Vec<(SourceId, Price)>,
}

impl Sample {
    /// Build a sample from the ordered quotes of a completed fan-out.
    pub fn from_quotes(timestamp: DateTime<Utc>, quotes: &[Quote]) -> Self {
        Self {
            timestamp,
            prices: quotes
                .iter()
                .map(|q| (q.source().clone(), q.price()))
                .collect(),
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Source/price pairs in configured source order.
    #[must_use]
    pub fn prices(&self) -> &[(SourceId, Price)] {
        &self.prices
    }

    /// Price reported by `source`, if it is part of this sample.
    #[must_use]
    pub fn price_of(&self, source: &SourceId) -> Option<Price> {
        self.prices
            .iter()
            .find(|(id, _)| id == source)
            .map(|(_, price)| *price)
    }

    /// Source identifiers in configured order.
    pub fn sources(&self) -> impl Iterator<Item = &SourceId> {
        self.prices.iter().map(|(id, _)| id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Serializes the price mapping as an ordered object of numbers so the
/// dashboard chart can index it by source name.
struct PriceMap<'a>(&'a [(SourceId, Price)]);

impl Serialize for PriceMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (source, price) in self.0 {
            map.serialize_entry(source.as_str(), &price.to_f64())?;
        }
        map.end()
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Sample", 3)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("time", &local_time(self.timestamp))?;
        state.serialize_field("prices", &PriceMap(&self.prices))?;
        state.end()
    }
}
