//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - Scripted [`QuoteSource`](crate::port::QuoteSource) with
//!   per-source prices, delays, failures and hangs.
//! - [`trade_log`] - In-memory [`TradeLog`](crate::port::TradeLog) that
//!   records appends and can be told to fail.

pub mod source;
pub mod trade_log;
