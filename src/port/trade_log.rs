//! Durable opportunity log port.

use async_trait::async_trait;

use crate::error::PersistenceError;

/// Append-only sink for opportunity records.
#[async_trait]
pub trait TradeLog: Send + Sync {
    /// Append one record. The implementation adds the line terminator.
    async fn append(&self, record: &str) -> Result<(), PersistenceError>;

    /// Implementation name for logging/debugging.
    fn name(&self) -> &'static str;
}
