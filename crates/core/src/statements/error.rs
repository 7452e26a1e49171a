//! Statement generation error types.

use ledgermap_shared::error::ConfigError;
use ledgermap_shared::types::AccountCode;
use thiserror::Error;

/// Errors that abort building a statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Rule or table configuration is broken.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A rule selected accounts an earlier rule already took.
    #[error("Rule '{rule}' maps accounts already mapped by an earlier rule: {}", format_codes(.codes))]
    DoubleMapping {
        /// Line name of the offending rule.
        rule: String,
        /// Every account code in the overlap.
        codes: Vec<AccountCode>,
    },

    /// The requested period is not in the trial balance.
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),
}

fn format_codes(codes: &[AccountCode]) -> String {
    codes
        .iter()
        .map(AccountCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl StatementError {
    /// Returns a stable identifier for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(inner) => inner.error_code(),
            Self::DoubleMapping { .. } => "DOUBLE_MAPPING",
            Self::UnknownPeriod(_) => "UNKNOWN_PERIOD",
        }
    }
}
