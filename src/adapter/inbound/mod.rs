//! Inbound adapters (driving side): the read-only dashboard.

pub mod dashboard;
