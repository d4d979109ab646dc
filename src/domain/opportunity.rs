//! Detected spread opportunities.

use chrono::{DateTime, Local, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::RoundingStrategy;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::id::SourceId;
use super::money::Percent;

/// A tick whose spread exceeded the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityEvent {
    timestamp: DateTime<Utc>,
    high_source: SourceId,
    low_source: SourceId,
    spread_pct: Percent,
}

impl OpportunityEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        high_source: SourceId,
        low_source: SourceId,
        spread_pct: Percent,
    ) -> Self {
        Self {
            timestamp,
            high_source,
            low_source,
            spread_pct,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Source quoting the highest price.
    #[must_use]
    pub fn high_source(&self) -> &SourceId {
        &self.high_source
    }

    /// Source quoting the lowest price.
    #[must_use]
    pub fn low_source(&self) -> &SourceId {
        &self.low_source
    }

    #[must_use]
    pub fn spread_pct(&self) -> Percent {
        self.spread_pct
    }

    /// The persisted line for this event.
    ///
    /// The format is read by external tooling and must not change:
    /// `[PROFIT] <high> vs <low> | Spread: <pct>%` with three decimals.
    #[must_use]
    pub fn record(&self) -> String {
        let pct = self
            .spread_pct
            .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
        format!(
            "[PROFIT] {} vs {} | Spread: {:.3}%",
            self.high_source, self.low_source, pct
        )
    }

    /// Display line for the recent-opportunity list, prefixed with local time.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("{}: {}", local_time(self.timestamp), self.record())
    }
}

pub(crate) fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

impl Serialize for OpportunityEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OpportunityEvent", 6)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("time", &local_time(self.timestamp))?;
        state.serialize_field("high_source", &self.high_source)?;
        state.serialize_field("low_source", &self.low_source)?;
        state.serialize_field("spread_pct", &self.spread_pct.to_f64())?;
        state.serialize_field("record", &self.record())?;
        state.end()
    }
}
