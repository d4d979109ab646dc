//! Spreadwatch - multi-source price spread sampling and detection.
//!
//! On a fixed cadence the crate fetches one quote per configured source
//! concurrently, ranks the quotes, and flags the tick as an opportunity
//! when the relative spread between the highest and lowest quote exceeds
//! a threshold.
//!
//! # Architecture
//!
//! - **`domain`** - Quotes, samples, opportunity events, the spread
//!   detector, and the bounded history store
//! - **`port`** - `QuoteSource` and `TradeLog` traits
//! - **`adapter`** - Simulated quote feed, file trade log, HTTP dashboard
//! - **`app`** - Fan-out with deadline and retry, the scheduler, wiring
//!
//! # Modules
//!
//! - [`app`] - Application orchestration and configuration
//! - [`cli`] - Command-line interface
//! - [`domain`] - Exchange-agnostic types and detection logic
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use spreadwatch::domain::{DetectorConfig, Quote, SpreadDetector};
//! use rust_decimal_macros::dec;
//!
//! let detector = SpreadDetector::new(&DetectorConfig::default());
//! let reading = detector.classify(&[
//!     Quote::new("NYSE", dec!(100)),
//!     Quote::new("NASDAQ", dec!(101)),
//! ]);
//! assert!(reading.is_opportunity());
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
