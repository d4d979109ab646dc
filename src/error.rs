use std::time::Duration;

use thiserror::Error;

use crate::domain::SourceId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A single quote source call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("source {source_id} unavailable: {reason}")]
    Unavailable { source_id: SourceId, reason: String },
}

impl SourceError {
    /// The source that produced the error.
    #[must_use]
    pub fn source_id(&self) -> &SourceId {
        match self {
            Self::Unavailable { source_id, .. } => source_id,
        }
    }
}

/// Failure of a fan-out attempt, or of the whole retry budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FanoutError {
    #[error("fan-out deadline of {deadline:?} elapsed")]
    Timeout { deadline: Duration },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("fan-out failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<FanoutError>,
    },
}

/// Durable write of an opportunity record failed.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to append to {path}: {source}")]
    Append {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("trade log unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Fanout(#[from] FanoutError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("failed to bind dashboard on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
