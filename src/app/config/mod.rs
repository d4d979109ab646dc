//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Every section is optional and
//! falls back to the reference values, so an empty file is a valid config.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

mod logging;
mod sampler;

// Re-export all public types from submodules
pub use crate::adapter::inbound::dashboard::DashboardConfig;
pub use crate::adapter::outbound::{SimulatorConfig, TradeLogConfig};
pub use crate::domain::{DetectorConfig, HistoryConfig};
pub use logging::LoggingConfig;
pub use sampler::{SamplerConfig, SourceConfig};

/// Minimum number of sources needed to compute a spread.
pub const MIN_SOURCES: usize = 2;

fn default_instrument() -> String {
    "NVDA (NVIDIA Corp)".into()
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Display label of the sampled instrument.
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// Ordered list of price sources.
    #[serde(default = "sampler::default_sources")]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub trade_log: TradeLogConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instrument: default_instrument(),
            sources: sampler::default_sources(),
            sampler: SamplerConfig::default(),
            detector: DetectorConfig::default(),
            history: HistoryConfig::default(),
            simulator: SimulatorConfig::default(),
            trade_log: TradeLogConfig::default(),
            dashboard: DashboardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use the defaults.
    ///
    /// Returns whether a file was read.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::load(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.len() < MIN_SOURCES {
            return Err(ConfigError::InvalidValue {
                field: "sources",
                reason: format!(
                    "at least {MIN_SOURCES} sources are required, got {}",
                    self.sources.len()
                ),
            }
            .into());
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.id.as_str().trim().is_empty() {
                return Err(ConfigError::MissingField { field: "sources.id" }.into());
            }
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "sources",
                    reason: format!("duplicate source id {}", source.id),
                }
                .into());
            }
        }

        if self.sampler.cadence_ms == 0 {
            return Err(invalid("cadence_ms", "must be greater than zero"));
        }
        if self.sampler.deadline_ms == 0 {
            return Err(invalid("deadline_ms", "must be greater than zero"));
        }
        if self.detector.threshold_pct < Decimal::ZERO {
            return Err(invalid("threshold_pct", "must not be negative"));
        }
        if self.history.sample_capacity == 0 {
            return Err(invalid("sample_capacity", "must be greater than zero"));
        }
        if self.history.opportunity_capacity == 0 {
            return Err(invalid("opportunity_capacity", "must be greater than zero"));
        }
        if self.simulator.base_price <= Decimal::ZERO {
            return Err(invalid("base_price", "must be positive"));
        }
        if self.simulator.jitter < Decimal::ZERO {
            return Err(invalid("jitter", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.simulator.failure_rate) {
            return Err(invalid("failure_rate", "must be within [0, 1]"));
        }
        if self.trade_log.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "trade_log.path",
            }
            .into());
        }
        if self.dashboard.enabled && self.dashboard.bind.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "dashboard.bind",
            }
            .into());
        }

        Ok(())
    }

    /// Configured source ids, in order.
    #[must_use]
    pub fn source_ids(&self) -> Vec<crate::domain::SourceId> {
        self.sources.iter().map(|s| s.id.clone()).collect()
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_uses_reference_values() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.instrument, "NVDA (NVIDIA Corp)");
        let ids: Vec<_> = config.source_ids().iter().map(|s| s.to_string()).collect();
        assert_eq!(ids, vec!["NYSE", "NASDAQ", "IEX", "ARCA"]);
        assert_eq!(config.sampler.cadence_ms, 1_000);
        assert_eq!(config.sampler.deadline_ms, 900);
        assert_eq!(config.sampler.max_retries, 2);
        assert_eq!(config.detector.threshold_pct, dec!(0.05));
        assert_eq!(config.history.sample_capacity, 20);
        assert_eq!(config.history.opportunity_capacity, 10);
        assert_eq!(config.trade_log.path.to_str(), Some("trades.log"));
        assert_eq!(config.dashboard.bind, "127.0.0.1:3000");
    }

    #[test]
    fn parses_full_config() {
        let toml = r#"
instrument = "AAPL"

[[sources]]
id = "X"

[[sources]]
id = "Y"

[sampler]
cadence_ms = 500
deadline_ms = 200
max_retries = 4

[detector]
threshold_pct = "0.1"

[simulator]
base_price = 10
jitter = 0.5
failure_rate = 0.25

[logging]
level = "debug"
format = "json"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.instrument, "AAPL");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sampler.max_retries, 4);
        assert_eq!(config.detector.threshold_pct, dec!(0.1));
        assert_eq!(config.simulator.base_price, dec!(10));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn rejects_single_source() {
        let toml = r#"
[[sources]]
id = "ONLY"
"#;

        assert!(matches!(
            Config::parse(toml),
            Err(Error::Config(ConfigError::InvalidValue { field: "sources", .. }))
        ));
    }

    #[test]
    fn rejects_duplicate_sources() {
        let toml = r#"
[[sources]]
id = "A"

[[sources]]
id = "A"
"#;

        assert!(matches!(
            Config::parse(toml),
            Err(Error::Config(ConfigError::InvalidValue { field: "sources", .. }))
        ));
    }

    #[test]
    fn rejects_zero_deadline() {
        let toml = r#"
[sampler]
deadline_ms = 0
"#;

        assert!(matches!(
            Config::parse(toml),
            Err(Error::Config(ConfigError::InvalidValue { field: "deadline_ms", .. }))
        ));
    }

    #[test]
    fn rejects_out_of_range_failure_rate() {
        let toml = r#"
[simulator]
failure_rate = 1.5
"#;

        assert!(matches!(
            Config::parse(toml),
            Err(Error::Config(ConfigError::InvalidValue { field: "failure_rate", .. }))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let (config, loaded) =
            Config::load_or_default("/nonexistent/spreadwatch/config.toml").unwrap();

        assert!(!loaded);
        assert_eq!(config.sources.len(), 4);
    }
}
