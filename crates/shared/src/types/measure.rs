//! Ledger measures and statement categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named numeric column of a trial balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Debit balance at the start of the period.
    OpeningDebit,
    /// Credit balance at the start of the period.
    OpeningCredit,
    /// Debit movements during the period.
    PeriodDebit,
    /// Credit movements during the period.
    PeriodCredit,
    /// Debit balance at the end of the period.
    ClosingDebit,
    /// Credit balance at the end of the period.
    ClosingCredit,
}

impl Measure {
    /// All measures in column order.
    pub const ALL: [Self; 6] = [
        Self::OpeningDebit,
        Self::OpeningCredit,
        Self::PeriodDebit,
        Self::PeriodCredit,
        Self::ClosingDebit,
        Self::ClosingCredit,
    ];

    /// Returns the column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpeningDebit => "opening_debit",
            Self::OpeningCredit => "opening_credit",
            Self::PeriodDebit => "period_debit",
            Self::PeriodCredit => "period_credit",
            Self::ClosingDebit => "closing_debit",
            Self::ClosingCredit => "closing_credit",
        }
    }

    /// Returns true for the two closing-balance columns, the only ones a
    /// signed balance can be derived from.
    #[must_use]
    pub const fn is_closing(self) -> bool {
        matches!(self, Self::ClosingDebit | Self::ClosingCredit)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| format!("Unknown measure: {s}"))
    }
}

/// The statement family an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Balance-sheet account.
    #[serde(rename = "BS")]
    BalanceSheet,
    /// Profit-and-loss account.
    #[serde(rename = "PL")]
    ProfitAndLoss,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BalanceSheet => write!(f, "BS"),
            Self::ProfitAndLoss => write!(f, "PL"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BS" => Ok(Self::BalanceSheet),
            "PL" | "IS" => Ok(Self::ProfitAndLoss),
            _ => Err(format!("Unknown category: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "measure_tests.rs"]
mod tests;
