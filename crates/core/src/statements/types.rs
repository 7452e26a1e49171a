//! Statement data types.

use std::fmt;

use ledgermap_shared::types::AccountCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::mapping::ComputationKind;

/// Which statement a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    /// Balance sheet.
    #[serde(rename = "BS")]
    BalanceSheet,
    /// Income statement.
    #[serde(rename = "IS")]
    IncomeStatement,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BalanceSheet => write!(f, "BS"),
            Self::IncomeStatement => write!(f, "IS"),
        }
    }
}

/// The amount of a statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineAmount {
    /// One figure.
    Single {
        /// The amount.
        amount: Decimal,
    },
    /// Positive and negative balances kept apart.
    Split {
        /// Sum of positive balances.
        positive: Decimal,
        /// Sum of negative balances.
        negative: Decimal,
    },
}

impl LineAmount {
    /// Creates a single amount.
    #[must_use]
    pub const fn single(amount: Decimal) -> Self {
        Self::Single { amount }
    }

    /// Flattens the amount to one figure; a split pair is added up.
    #[must_use]
    pub fn total(&self) -> Decimal {
        match *self {
            Self::Single { amount } => amount,
            Self::Split { positive, negative } => positive + negative,
        }
    }
}

/// One line of a generated statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Line name.
    pub line: String,
    /// Section name.
    pub section: String,
    /// Computed amount.
    pub amount: LineAmount,
    /// Accounts that make up the amount, in leaf order.
    pub accounts: Vec<AccountCode>,
    /// How the amount was computed.
    pub kind: ComputationKind,
    /// Position of the producing rule.
    pub order_index: usize,
}

impl StatementLine {
    /// The amount flattened to one figure, as presented.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.amount.total()
    }

    /// The amount in ledger sign (debit positive). Only the turnover credit
    /// convention presents amounts with the opposite sign.
    #[must_use]
    pub fn ledger_total(&self) -> Decimal {
        match self.kind {
            ComputationKind::TurnoverCredit => -self.total(),
            ComputationKind::ClosingSigned
            | ComputationKind::ClosingDebit
            | ComputationKind::ClosingCredit
            | ComputationKind::SeparateNegative
            | ComputationKind::TurnoverDebit => self.total(),
        }
    }
}
