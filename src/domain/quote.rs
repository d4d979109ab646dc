//! A single source's reported price.

use serde::Serialize;

use super::id::SourceId;
use super::money::Price;

/// One source's price at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    source: SourceId,
    price: Price,
}

impl Quote {
    /// Create a new quote.
    pub fn new(source: impl Into<SourceId>, price: Price) -> Self {
        Self {
            source: source.into(),
            price,
        }
    }

    /// The source that reported this price.
    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// The reported price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }
}
