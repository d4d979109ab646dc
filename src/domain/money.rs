//! Monetary types for price and spread representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Relative spread in percent (1.5 means 1.5%).
pub type Percent = Decimal;
