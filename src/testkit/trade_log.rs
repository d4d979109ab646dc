//! Recording trade log.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::PersistenceError;
use crate::port::TradeLog;

/// Thread-safe record collector for persistence assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingTradeLog {
    records: Mutex<Vec<String>>,
    attempts: Mutex<usize>,
    failing: AtomicBool,
}

impl RecordingTradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log whose appends always fail.
    pub fn failing() -> Self {
        let log = Self::default();
        log.set_failing(true);
        log
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successfully appended records, oldest first.
    pub fn records(&self) -> Vec<String> {
        self.records.lock().clone()
    }

    /// Number of `append` calls, including failed ones.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl TradeLog for RecordingTradeLog {
    async fn append(&self, record: &str) -> Result<(), PersistenceError> {
        *self.attempts.lock() += 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("disk full".into()));
        }
        self.records.lock().push(record.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
