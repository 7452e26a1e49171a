//! Configuration error types.
//!
//! Every variant here is fatal to the run that hit it: they describe a broken
//! input table or rule definition, never a data-quality finding.

use thiserror::Error;

use crate::types::Measure;

/// Result type alias using `ConfigError`.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while validating tables, rule definitions, or settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A row carries a measure the table does not declare.
    #[error("Missing column {measure} (used by account {code})")]
    MissingColumn {
        /// The undeclared measure.
        measure: Measure,
        /// Account code of the offending row.
        code: String,
    },

    /// Amounts are computed from closing balances the input does not carry.
    #[error("{consumer} needs a closing balance column but the input has none")]
    MissingBalanceColumn {
        /// What asked for the balance (a rule or the hierarchy mapping).
        consumer: String,
    },

    /// An account code normalized to the empty string.
    #[error("Account code {0:?} is empty after normalization")]
    EmptyAccountCode(String),

    /// A selector definition is structurally invalid.
    #[error("Malformed selector for rule '{rule}': {reason}")]
    MalformedSelector {
        /// Rule (statement line) name.
        rule: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The computation kind is not one the engine knows.
    #[error("Unsupported computation kind: {0}")]
    UnsupportedComputationKind(String),

    /// A debit/credit filter was requested but no signed balance exists.
    #[error("Balance filter '{filter}' requested but the input has no closing balance column")]
    BalanceFilterWithoutBalance {
        /// The requested filter.
        filter: String,
    },

    /// A range bound cannot be compared numerically or lexically.
    #[error("Unsupported range selector [{low:?}, {high:?}]")]
    UnsupportedRangeSelector {
        /// Lower bound as configured.
        low: String,
        /// Upper bound as configured.
        high: String,
    },

    /// The rule table could not be parsed.
    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(#[from] serde_json::Error),

    /// Engine settings could not be loaded.
    #[error("Configuration load failed: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    /// Returns a stable identifier for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingColumn { .. } => "MISSING_COLUMN",
            Self::MissingBalanceColumn { .. } => "MISSING_BALANCE_COLUMN",
            Self::EmptyAccountCode(_) => "EMPTY_ACCOUNT_CODE",
            Self::MalformedSelector { .. } => "MALFORMED_SELECTOR",
            Self::UnsupportedComputationKind(_) => "UNSUPPORTED_COMPUTATION_KIND",
            Self::BalanceFilterWithoutBalance { .. } => "BALANCE_FILTER_WITHOUT_BALANCE",
            Self::UnsupportedRangeSelector { .. } => "UNSUPPORTED_RANGE_SELECTOR",
            Self::InvalidRuleTable(_) => "INVALID_RULE_TABLE",
            Self::Load(_) => "CONFIG_LOAD_FAILED",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
