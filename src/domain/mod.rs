//! Exchange-agnostic domain logic.

mod detector;
mod history;
mod id;
mod money;
mod opportunity;
mod quote;
mod ring;
mod sample;

// Core domain types
pub use id::SourceId;
pub use money::{Percent, Price};
pub use opportunity::OpportunityEvent;
pub use quote::Quote;
pub use sample::Sample;

// Bounded history
pub use history::{HistoryConfig, HistorySnapshot, HistoryStore};
pub use ring::BoundedBuffer;

// Detector
pub use detector::{DetectorConfig, Spread, SpreadDetector, SpreadReading};
