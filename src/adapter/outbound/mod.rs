//! Outbound adapters (driven side): price feeds and durable storage.

pub mod simulator;
pub mod trade_log;

pub use simulator::{SimulatedQuoteSource, SimulatorConfig};
pub use trade_log::{FileTradeLog, TradeLogConfig};
