//! Quote source port.

use async_trait::async_trait;

use crate::domain::{Quote, SourceId};
use crate::error::SourceError;

/// Something that can report the current price quoted by a source.
///
/// Implementations must be cancel-safe: the fan-out drops in-flight calls
/// when its deadline elapses.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the current price for `source`.
    async fn get_price(&self, source: &SourceId) -> Result<Quote, SourceError>;

    /// Implementation name for logging/debugging.
    fn name(&self) -> &'static str;
}
