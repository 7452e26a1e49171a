//! The trial balance table and its per-period leaf views.

use std::collections::BTreeSet;

use ledgermap_shared::error::{ConfigError, ConfigResult};
use ledgermap_shared::types::{Category, Measure};
use rust_decimal::Decimal;
use tracing::debug;

use super::account::LedgerAccount;
use crate::chart::LeafClassifier;

/// A validated, immutable trial balance spanning one or more periods.
#[derive(Debug, Clone)]
pub struct TrialBalance {
    columns: BTreeSet<Measure>,
    accounts: Vec<LedgerAccount>,
    periods: Vec<String>,
}

impl TrialBalance {
    /// Builds the table and computes leaf flags once per period.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingColumn` if a row carries a measure that
    /// `columns` does not declare.
    pub fn new(
        columns: impl IntoIterator<Item = Measure>,
        mut accounts: Vec<LedgerAccount>,
    ) -> ConfigResult<Self> {
        let columns: BTreeSet<Measure> = columns.into_iter().collect();

        for account in &accounts {
            if let Some(measure) = account.measures.keys().find(|m| !columns.contains(m)) {
                return Err(ConfigError::MissingColumn {
                    measure: *measure,
                    code: account.code.to_string(),
                });
            }
        }

        let keyed: Vec<(&str, &str)> = accounts
            .iter()
            .map(|a| (a.period.as_str(), a.code.as_str()))
            .collect();
        let flags = LeafClassifier::classify_grouped(&keyed);
        for (account, is_leaf) in accounts.iter_mut().zip(flags) {
            account.is_leaf = is_leaf;
        }

        let mut periods: Vec<String> = Vec::new();
        for account in &accounts {
            if !periods.contains(&account.period) {
                periods.push(account.period.clone());
            }
        }

        debug!(
            rows = accounts.len(),
            periods = periods.len(),
            leaves = accounts.iter().filter(|a| a.is_leaf).count(),
            "trial balance classified"
        );

        Ok(Self {
            columns,
            accounts,
            periods,
        })
    }

    /// Declared measure columns.
    #[must_use]
    pub const fn columns(&self) -> &BTreeSet<Measure> {
        &self.columns
    }

    /// All rows, in input order.
    #[must_use]
    pub fn accounts(&self) -> &[LedgerAccount] {
        &self.accounts
    }

    /// Distinct periods in first-seen order.
    #[must_use]
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Returns true if a signed closing balance can be derived.
    #[must_use]
    pub fn has_signed_balance(&self) -> bool {
        self.columns.iter().any(|m| m.is_closing())
    }

    /// Leaf rows of one period. Unknown periods yield an empty view.
    #[must_use]
    pub fn leaves(&self, period: &str) -> LeafSet<'_> {
        LeafSet::new(
            self.accounts
                .iter()
                .filter(|a| a.period == period && a.is_leaf)
                .collect(),
            self.has_signed_balance(),
        )
    }
}

/// Borrowed view of the leaf accounts of one period.
#[derive(Debug, Clone)]
pub struct LeafSet<'a> {
    accounts: Vec<&'a LedgerAccount>,
    has_signed_balance: bool,
}

impl<'a> LeafSet<'a> {
    /// Wraps already-selected leaf rows.
    #[must_use]
    pub fn new(accounts: Vec<&'a LedgerAccount>, has_signed_balance: bool) -> Self {
        Self {
            accounts,
            has_signed_balance,
        }
    }

    /// The leaf rows, in table order.
    #[must_use]
    pub fn accounts(&self) -> &[&'a LedgerAccount] {
        &self.accounts
    }

    /// Iterates over the leaf rows.
    pub fn iter(&self) -> impl Iterator<Item = &'a LedgerAccount> + '_ {
        self.accounts.iter().copied()
    }

    /// Number of leaf rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the view holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Returns true if the source table has a closing-balance column.
    #[must_use]
    pub const fn has_signed_balance(&self) -> bool {
        self.has_signed_balance
    }

    /// Sum of signed closing balances of the leaves in `category`.
    #[must_use]
    pub fn closing_total(&self, category: Category) -> Decimal {
        self.iter()
            .filter(|a| a.category == category)
            .map(LedgerAccount::closing_signed)
            .sum()
    }
}
