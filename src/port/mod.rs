//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams the sampling pipeline is polymorphic over. Adapters
//! implement them to plug in price feeds and durable storage.
//!
//! ```text
//!                  ┌─────────────────────────┐
//!                  │        Scheduler        │
//!                  │  fan-out · detector ·   │
//!                  │      history store      │
//!                  └───────┬─────────┬───────┘
//!                          │         │
//!                          ▼         ▼
//!                   ┌──────────┐ ┌──────────┐
//!                   │  Quote   │ │  Trade   │
//!                   │  Source  │ │   Log    │
//!                   └──────────┘ └──────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`QuoteSource`] - Current price for a named source
//! - [`TradeLog`] - Append-only durable record of opportunities

mod source;
mod trade_log;

pub use source::QuoteSource;
pub use trade_log::TradeLog;
