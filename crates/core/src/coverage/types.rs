//! Coverage report types.

use ledgermap_shared::types::{AccountCode, Category};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statements::Statement;

/// Outcome of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCheck {
    /// Check name.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Numeric difference (or count of offending accounts).
    pub difference: Decimal,
}

impl CoverageCheck {
    /// Creates a check result.
    #[must_use]
    pub fn new(name: impl Into<String>, passed: bool, difference: Decimal) -> Self {
        Self {
            name: name.into(),
            passed,
            difference,
        }
    }
}

/// Mapping flags of one leaf account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCoverage {
    /// Account code.
    pub code: AccountCode,
    /// Account category.
    pub category: Category,
    /// Appears under a balance-sheet line.
    pub mapped_bs: bool,
    /// Appears under an income-statement line.
    pub mapped_pl: bool,
}

/// An account listed under more than one line of one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMapping {
    /// Account code.
    pub code: AccountCode,
    /// Statement where it happens.
    pub statement: Statement,
    /// Every line name listing the account.
    pub lines: Vec<String>,
}

/// Structural role of a balance-sheet section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRole {
    /// Assets.
    Assets,
    /// Liabilities.
    Liabilities,
    /// Equity.
    Equity,
    /// Anything else.
    Other,
}

impl SectionRole {
    /// Infers the role from section text (case-insensitive substring).
    #[must_use]
    pub fn from_section(section: &str) -> Self {
        let section = section.to_lowercase();
        if section.contains("asset") {
            Self::Assets
        } else if section.contains("liabilit") {
            Self::Liabilities
        } else if section.contains("equity") {
            Self::Equity
        } else {
            Self::Other
        }
    }
}

/// Result of validating one period's statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Checks in evaluation order.
    pub checks: Vec<CoverageCheck>,
    /// Per-leaf mapping flags.
    pub accounts: Vec<AccountCoverage>,
    /// BS leaves not under any balance-sheet line.
    pub unmapped_bs: Vec<AccountCode>,
    /// PL leaves not under any income-statement line.
    pub unmapped_pl: Vec<AccountCode>,
    /// Accounts under more than one line of a statement.
    pub duplicates: Vec<DuplicateMapping>,
    /// Leaves mapped in both statements.
    pub overlapping: Vec<AccountCode>,
}

impl CoverageReport {
    /// Returns true if every check passed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Checks that failed.
    pub fn failed_checks(&self) -> impl Iterator<Item = &CoverageCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Looks a check up by name.
    #[must_use]
    pub fn check(&self, name: &str) -> Option<&CoverageCheck> {
        self.checks.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Current Assets", SectionRole::Assets)]
    #[case("NON-CURRENT ASSETS", SectionRole::Assets)]
    #[case("Current liabilities", SectionRole::Liabilities)]
    #[case("Liability", SectionRole::Liabilities)]
    #[case("Owner's equity", SectionRole::Equity)]
    #[case("Off-balance items", SectionRole::Other)]
    fn test_section_role(#[case] section: &str, #[case] expected: SectionRole) {
        assert_eq!(SectionRole::from_section(section), expected);
    }

    #[test]
    fn test_report_accessors() {
        let report = CoverageReport {
            checks: vec![
                CoverageCheck::new("balance_equation", true, Decimal::ZERO),
                CoverageCheck::new("bs_unmapped_leaves", false, Decimal::from(2)),
            ],
            ..CoverageReport::default()
        };

        assert!(!report.is_clean());
        let failed: Vec<&str> = report.failed_checks().map(|c| c.name.as_str()).collect();
        assert_eq!(failed, vec!["bs_unmapped_leaves"]);
        assert!(report.check("balance_equation").unwrap().passed);
        assert!(report.check("missing").is_none());
    }
}
