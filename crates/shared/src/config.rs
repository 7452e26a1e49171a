//! Engine configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigResult;

/// Settings shared by every aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Absolute tolerance for reconciliation checks.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Code prefix of the retained-earnings accounts.
    #[serde(default = "default_retained_earnings_prefix")]
    pub retained_earnings_prefix: String,
    /// Strip every non-digit character from account codes on ingestion.
    #[serde(default)]
    pub digits_only_codes: bool,
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_retained_earnings_prefix() -> String {
    "421".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            retained_earnings_prefix: default_retained_earnings_prefix(),
            digits_only_codes: false,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `config/ledgermap.*` and `LEDGERMAP__*`
    /// environment variables. Missing sources fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a source exists but cannot be parsed.
    pub fn load() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/ledgermap").required(false))
            .add_source(config::Environment::with_prefix("LEDGERMAP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
