//! File-backed trade log.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::PersistenceError;
use crate::port::TradeLog;

/// Where opportunity records are appended.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeLogConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("trades.log")
}

impl Default for TradeLogConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

/// Appends newline-terminated records to a plain text file.
///
/// The file is opened for each record and closed before `append` returns,
/// so no handle is held between ticks.
#[derive(Debug, Clone)]
pub struct FileTradeLog {
    path: PathBuf,
}

impl FileTradeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &TradeLogConfig) -> Self {
        Self::new(config.path.clone())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Append {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl TradeLog for FileTradeLog {
    async fn append(&self, record: &str) -> Result<(), PersistenceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.append_error(e))?;

        let mut line = String::with_capacity(record.len() + 1);
        line.push_str(record);
        line.push('\n');

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.append_error(e))?;
        file.flush().await.map_err(|e| self.append_error(e))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
