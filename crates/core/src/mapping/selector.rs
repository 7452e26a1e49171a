//! Account selectors and their resolution against a leaf set.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use ledgermap_shared::error::{ConfigError, ConfigResult};
use ledgermap_shared::types::AccountCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{LeafSet, LedgerAccount};

/// Narrows a selection to one side of the signed closing balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceFilter {
    /// Keep accounts whose signed balance is > 0.
    Debit,
    /// Keep accounts whose signed balance is < 0.
    Credit,
}

impl BalanceFilter {
    /// Returns true if `signed` falls on this side.
    #[must_use]
    pub fn retains(self, signed: Decimal) -> bool {
        match self {
            Self::Debit => signed > Decimal::ZERO,
            Self::Credit => signed < Decimal::ZERO,
        }
    }
}

impl fmt::Display for BalanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
        }
    }
}

impl FromStr for BalanceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown balance filter: {s}")),
        }
    }
}

/// An inclusive code range.
///
/// When both bounds parse as numbers, codes are compared as numbers and
/// non-numeric codes never match. If either bound is not numeric, both sides
/// are compared as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeRange {
    /// Numeric comparison on the code's value.
    Numeric {
        /// Lower bound (inclusive).
        low: Decimal,
        /// Upper bound (inclusive).
        high: Decimal,
    },
    /// Lexical comparison on the code text.
    Lexical {
        /// Lower bound (inclusive).
        low: String,
        /// Upper bound (inclusive).
        high: String,
    },
}

impl CodeRange {
    /// Resolves the comparison mode for a pair of bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedRangeSelector` if a bound is blank.
    pub fn new(low: &str, high: &str) -> ConfigResult<Self> {
        let (low_text, high_text) = (low.trim(), high.trim());
        if low_text.is_empty() || high_text.is_empty() {
            return Err(ConfigError::UnsupportedRangeSelector {
                low: low.to_string(),
                high: high.to_string(),
            });
        }

        match (Decimal::from_str(low_text), Decimal::from_str(high_text)) {
            (Ok(low), Ok(high)) => Ok(Self::Numeric { low, high }),
            _ => Ok(Self::Lexical {
                low: low_text.to_string(),
                high: high_text.to_string(),
            }),
        }
    }

    /// Returns true if the code lies within the bounds.
    #[must_use]
    pub fn contains(&self, code: &AccountCode) -> bool {
        match self {
            Self::Numeric { low, high } => code
                .as_numeric()
                .is_some_and(|value| *low <= value && value <= *high),
            Self::Lexical { low, high } => {
                low.as_str() <= code.as_str() && code.as_str() <= high.as_str()
            }
        }
    }

    /// Returns true if the lower bound exceeds the upper one.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        match self {
            Self::Numeric { low, high } => low > high,
            Self::Lexical { low, high } => low > high,
        }
    }
}

/// OR-combination of codes, prefixes and ranges, optionally narrowed by a
/// balance filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Exact codes.
    pub codes: BTreeSet<AccountCode>,
    /// Code prefixes.
    pub prefixes: Vec<String>,
    /// Inclusive ranges.
    pub ranges: Vec<CodeRange>,
    /// Optional debit/credit narrowing.
    pub balance_filter: Option<BalanceFilter>,
}

impl Selector {
    /// Creates an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact code.
    #[must_use]
    pub fn with_code(mut self, code: AccountCode) -> Self {
        self.codes.insert(code);
        self
    }

    /// Adds a prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Adds a range.
    #[must_use]
    pub fn with_range(mut self, range: CodeRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Sets the balance filter.
    #[must_use]
    pub const fn with_balance_filter(mut self, filter: BalanceFilter) -> Self {
        self.balance_filter = Some(filter);
        self
    }

    /// Returns true if no code, prefix or range is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.prefixes.is_empty() && self.ranges.is_empty()
    }

    /// Returns true if the code is selected, ignoring the balance filter.
    #[must_use]
    pub fn matches_code(&self, code: &AccountCode) -> bool {
        self.codes.contains(code)
            || self.prefixes.iter().any(|p| code.as_str().starts_with(p.as_str()))
            || self.ranges.iter().any(|r| r.contains(code))
    }
}

/// Applies selectors to leaf sets.
pub struct SelectorResolver;

impl SelectorResolver {
    /// Returns the leaves the selector picks, in leaf-set order.
    ///
    /// The result is always a subset of `leaves`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BalanceFilterWithoutBalance` if the selector
    /// carries a balance filter but the leaves have no closing balance.
    pub fn resolve<'a>(
        leaves: &LeafSet<'a>,
        selector: &Selector,
    ) -> ConfigResult<Vec<&'a LedgerAccount>> {
        if let Some(filter) = selector.balance_filter
            && !leaves.has_signed_balance()
        {
            return Err(ConfigError::BalanceFilterWithoutBalance {
                filter: filter.to_string(),
            });
        }

        Ok(leaves
            .iter()
            .filter(|account| selector.matches_code(&account.code))
            .filter(|account| {
                selector
                    .balance_filter
                    .is_none_or(|filter| filter.retains(account.closing_signed()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgermap_shared::types::Category;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn code(raw: &str) -> AccountCode {
        raw.parse().unwrap()
    }

    fn leaf(raw: &str, balance: Decimal) -> LedgerAccount {
        LedgerAccount::new(code(raw), raw, Category::BalanceSheet, "2024")
            .with_closing_balance(balance)
    }

    fn codes(selected: &[&LedgerAccount]) -> Vec<String> {
        selected.iter().map(|a| a.code.to_string()).collect()
    }

    #[rstest]
    #[case("100", "200", "150", true)]
    #[case("100", "200", "100", true)]
    #[case("100", "200", "200", true)]
    #[case("100", "200", "1500", false)]
    #[case("100", "200", "15A", false)]
    fn test_numeric_range(
        #[case] low: &str,
        #[case] high: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let range = CodeRange::new(low, high).unwrap();
        assert!(matches!(range, CodeRange::Numeric { .. }));
        assert_eq!(range.contains(&code(candidate)), expected);
    }

    #[rstest]
    #[case("100", "2A0", "1500", true)]
    #[case("100", "2A0", "2A0", true)]
    #[case("100", "2A0", "2B", false)]
    #[case("A10", "A20", "A15", true)]
    fn test_lexical_range_when_a_bound_is_not_numeric(
        #[case] low: &str,
        #[case] high: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let range = CodeRange::new(low, high).unwrap();
        assert!(matches!(range, CodeRange::Lexical { .. }));
        assert_eq!(range.contains(&code(candidate)), expected);
    }

    #[test]
    fn test_blank_bound_is_unsupported() {
        assert!(matches!(
            CodeRange::new(" ", "200"),
            Err(ConfigError::UnsupportedRangeSelector { .. })
        ));
    }

    #[test]
    fn test_inverted_range() {
        assert!(CodeRange::new("200", "100").unwrap().is_inverted());
        assert!(!CodeRange::new("100", "200").unwrap().is_inverted());
    }

    #[test]
    fn test_selector_is_or_combined() {
        let rows = [
            leaf("1111", dec!(10)),
            leaf("1121", dec!(20)),
            leaf("1311", dec!(30)),
            leaf("1550", dec!(40)),
            leaf("2111", dec!(50)),
        ];
        let leaves = LeafSet::new(rows.iter().collect(), true);
        let selector = Selector::new()
            .with_code(code("1111"))
            .with_prefix("13")
            .with_range(CodeRange::new("1500", "1599").unwrap());

        let selected = SelectorResolver::resolve(&leaves, &selector).unwrap();
        assert_eq!(codes(&selected), vec!["1111", "1311", "1550"]);
    }

    #[test]
    fn test_balance_filters() {
        let rows = [
            leaf("1311", dec!(30)),
            leaf("1312", dec!(-5)),
            leaf("1313", dec!(0)),
        ];
        let leaves = LeafSet::new(rows.iter().collect(), true);

        let debit = Selector::new()
            .with_prefix("131")
            .with_balance_filter(BalanceFilter::Debit);
        let credit = Selector::new()
            .with_prefix("131")
            .with_balance_filter(BalanceFilter::Credit);
        let unfiltered = Selector::new().with_prefix("131");

        assert_eq!(
            codes(&SelectorResolver::resolve(&leaves, &debit).unwrap()),
            vec!["1311"]
        );
        assert_eq!(
            codes(&SelectorResolver::resolve(&leaves, &credit).unwrap()),
            vec!["1312"]
        );
        assert_eq!(
            SelectorResolver::resolve(&leaves, &unfiltered).unwrap().len(),
            3
        );
    }

    #[test]
    fn test_balance_filter_requires_signed_balance() {
        let rows = [leaf("1311", dec!(30))];
        let leaves = LeafSet::new(rows.iter().collect(), false);
        let selector = Selector::new()
            .with_prefix("131")
            .with_balance_filter(BalanceFilter::Credit);

        assert!(matches!(
            SelectorResolver::resolve(&leaves, &selector),
            Err(ConfigError::BalanceFilterWithoutBalance { .. })
        ));
    }

    #[test]
    fn test_balance_filter_from_str() {
        assert_eq!(BalanceFilter::from_str("Debit").unwrap(), BalanceFilter::Debit);
        assert_eq!(BalanceFilter::from_str("credit").unwrap(), BalanceFilter::Credit);
        assert!(BalanceFilter::from_str("both").is_err());
    }
}
