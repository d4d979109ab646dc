//! Sampling cadence and fan-out budget.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::SourceId;

/// Timing of the sampling loop.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    /// Minimum interval between tick starts in milliseconds
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,

    /// Overall deadline for one fan-out attempt in milliseconds
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Additional fan-out attempts after the first one fails
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_cadence_ms() -> u64 {
    1_000
}

fn default_deadline_ms() -> u64 {
    900
}

fn default_max_retries() -> u32 {
    2
}

impl SamplerConfig {
    #[must_use]
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            cadence_ms: default_cadence_ms(),
            deadline_ms: default_deadline_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// One configured price source.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub id: SourceId,
}

impl SourceConfig {
    pub fn new(id: impl Into<SourceId>) -> Self {
        Self { id: id.into() }
    }
}

pub(super) fn default_sources() -> Vec<SourceConfig> {
    ["NYSE", "NASDAQ", "IEX", "ARCA"]
        .into_iter()
        .map(SourceConfig::new)
        .collect()
}
