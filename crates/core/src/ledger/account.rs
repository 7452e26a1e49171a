//! Ledger account rows.

use std::collections::BTreeMap;

use ledgermap_shared::EngineConfig;
use ledgermap_shared::error::ConfigResult;
use ledgermap_shared::types::{AccountCode, Category, Measure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trial-balance row for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Normalized account code.
    pub code: AccountCode,
    /// Account description.
    pub description: String,
    /// Statement family (BS or PL).
    pub category: Category,
    /// Grouping key, usually the reporting period.
    pub period: String,
    /// Named numeric fields present on this row.
    pub measures: BTreeMap<Measure, Decimal>,
    /// Whether no other code of the same period extends this one.
    #[serde(default)]
    pub(crate) is_leaf: bool,
}

impl LedgerAccount {
    /// Creates a row without measures.
    #[must_use]
    pub fn new(
        code: AccountCode,
        description: impl Into<String>,
        category: Category,
        period: impl Into<String>,
    ) -> Self {
        Self {
            code,
            description: description.into(),
            category,
            period: period.into(),
            measures: BTreeMap::new(),
            is_leaf: false,
        }
    }

    /// Creates a row from a code as it appears in the source table,
    /// normalized according to `config.digits_only_codes`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyAccountCode` if nothing of the code is left.
    pub fn from_raw(
        raw_code: &str,
        description: impl Into<String>,
        category: Category,
        period: impl Into<String>,
        config: &EngineConfig,
    ) -> ConfigResult<Self> {
        let code = AccountCode::normalize(raw_code, config.digits_only_codes)?;
        Ok(Self::new(code, description, category, period))
    }

    /// Sets a measure.
    #[must_use]
    pub fn with_measure(mut self, measure: Measure, value: Decimal) -> Self {
        self.measures.insert(measure, value);
        self
    }

    /// Sets the closing balance from a signed amount: positive values land on
    /// the debit side, negative values on the credit side.
    #[must_use]
    pub fn with_closing_balance(self, signed: Decimal) -> Self {
        if signed.is_sign_negative() {
            self.with_measure(Measure::ClosingDebit, Decimal::ZERO)
                .with_measure(Measure::ClosingCredit, -signed)
        } else {
            self.with_measure(Measure::ClosingDebit, signed)
                .with_measure(Measure::ClosingCredit, Decimal::ZERO)
        }
    }

    /// Returns a measure, zero when the row does not carry it.
    #[must_use]
    pub fn measure(&self, measure: Measure) -> Decimal {
        self.measures.get(&measure).copied().unwrap_or_default()
    }

    /// Signed closing balance: closing debit minus closing credit.
    #[must_use]
    pub fn closing_signed(&self) -> Decimal {
        self.measure(Measure::ClosingDebit) - self.measure(Measure::ClosingCredit)
    }

    /// Returns true if the account is a leaf of its period.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.is_leaf
    }
}
