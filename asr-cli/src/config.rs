//! Configuration file handling.
//!
//! Every section is optional; a missing file section falls back to the same
//! defaults the command line uses.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "asr.db"
//!
//! [deductions]
//! traditional_rate = 0.12
//! roth_rate = 0.0
//! ```

use std::path::Path;

use asr_core::calculations::{DeductionRates, DeductionRatesError};
use asr_core::db::DbConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level `asr` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsrConfig {
    #[serde(default)]
    pub database: DbConfig,

    #[serde(default)]
    pub deductions: DeductionsConfig,
}

/// 403(b) percentage rates applied when the matching election is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionsConfig {
    #[serde(default = "default_traditional_rate")]
    pub traditional_rate: Decimal,

    #[serde(default)]
    pub roth_rate: Decimal,
}

fn default_traditional_rate() -> Decimal {
    Decimal::new(12, 2)
}

impl Default for DeductionsConfig {
    fn default() -> Self {
        Self {
            traditional_rate: default_traditional_rate(),
            roth_rate: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid deduction rates: {0}")]
    InvalidRates(#[from] DeductionRatesError),
}

impl AsrConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds rates
    /// outside `[0, 1]`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a rate is out of range.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.rates()?;
        Ok(config)
    }

    /// The configured rates, validated.
    pub fn rates(&self) -> Result<DeductionRates, DeductionRatesError> {
        DeductionRates::new(self.deductions.traditional_rate, self.deductions.roth_rate)
    }
}
