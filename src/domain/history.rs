//! Shared, bounded history of samples and detected opportunities.
//!
//! The scheduler is the only writer; the dashboard polls snapshots. Both
//! collections sit behind one lock so a reader never sees a tick's sample
//! without its opportunity (or the other way around).

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::opportunity::OpportunityEvent;
use super::ring::BoundedBuffer;
use super::sample::Sample;

/// Capacities of the in-memory history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Samples kept for charting
    #[serde(default = "default_sample_capacity")]
    pub sample_capacity: usize,

    /// Recent opportunities kept for display
    #[serde(default = "default_opportunity_capacity")]
    pub opportunity_capacity: usize,
}

fn default_sample_capacity() -> usize {
    20
}

fn default_opportunity_capacity() -> usize {
    10
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            sample_capacity: default_sample_capacity(),
            opportunity_capacity: default_opportunity_capacity(),
        }
    }
}

struct Inner {
    samples: BoundedBuffer<Sample>,
    opportunities: BoundedBuffer<OpportunityEvent>,
}

/// Consistent copy of the history at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct HistorySnapshot {
    /// Oldest to newest.
    pub samples: Vec<Sample>,
    /// Newest to oldest.
    pub opportunities: Vec<OpportunityEvent>,
}

impl HistorySnapshot {
    #[must_use]
    pub fn opportunity_count(&self) -> usize {
        self.opportunities.len()
    }
}

/// Thread-safe bounded history store
pub struct HistoryStore {
    inner: RwLock<Inner>,
}

impl HistoryStore {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            inner: RwLock::new(Inner {
                samples: BoundedBuffer::new(config.sample_capacity),
                opportunities: BoundedBuffer::new(config.opportunity_capacity),
            }),
        }
    }

    /// Record one completed tick.
    pub fn record(&self, sample: Sample, opportunity: Option<OpportunityEvent>) {
        let mut inner = self.inner.write();
        inner.samples.push(sample);
        if let Some(event) = opportunity {
            inner.opportunities.push(event);
        }
    }

    /// Samples, oldest to newest.
    #[must_use]
    pub fn samples(&self) -> Vec<Sample> {
        self.inner.read().samples.to_vec()
    }

    /// Recent opportunities, newest to oldest.
    #[must_use]
    pub fn opportunities(&self) -> Vec<OpportunityEvent> {
        self.inner
            .read()
            .opportunities
            .iter_newest_first()
            .cloned()
            .collect()
    }

    /// Number of opportunities currently in the recent log.
    #[must_use]
    pub fn opportunity_count(&self) -> usize {
        self.inner.read().opportunities.len()
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.inner.read().samples.len()
    }

    /// Copy both collections under a single read lock.
    #[must_use]
    pub fn snapshot(&self) -> HistorySnapshot {
        let inner = self.inner.read();
        HistorySnapshot {
            samples: inner.samples.to_vec(),
            opportunities: inner.opportunities.iter_newest_first().cloned().collect(),
        }
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}
