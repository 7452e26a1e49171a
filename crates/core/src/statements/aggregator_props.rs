//! Property-based tests for rule aggregation.
//!
//! Covers the partition-sum law, the overlap law and determinism.

use proptest::prelude::*;
use rust_decimal::Decimal;

use ledgermap_shared::EngineConfig;
use ledgermap_shared::types::{AccountCode, Category};

use super::aggregator::RuleAggregator;
use super::error::StatementError;
use crate::coverage::CoverageValidator;
use crate::ledger::{LeafSet, LedgerAccount};
use crate::mapping::{ComputationKind, MappingRule, RuleSet, Selector};

/// Strategy for distinct four-digit BS leaves with balances in cents.
fn leaves_strategy() -> impl Strategy<Value = Vec<LedgerAccount>> {
    prop::collection::btree_map("[1-9][0-9]{3}", -10_000_000i64..10_000_000i64, 1..30).prop_map(
        |balances| {
            balances
                .into_iter()
                .map(|(code, cents)| {
                    LedgerAccount::new(
                        code.parse().unwrap(),
                        code,
                        Category::BalanceSheet,
                        "2024",
                    )
                    .with_closing_balance(Decimal::new(cents, 2))
                })
                .collect()
        },
    )
}

/// Strategy for kinds whose flattened amount keeps the ledger sign.
fn signed_kind() -> impl Strategy<Value = ComputationKind> {
    prop_oneof![
        Just(ComputationKind::ClosingSigned),
        Just(ComputationKind::SeparateNegative),
    ]
}

/// One rule per leading digit: selectors never intersect.
fn disjoint_rules(kinds: &[ComputationKind]) -> RuleSet {
    RuleSet::from_rules(
        (1..=9)
            .map(|digit| {
                MappingRule::new(
                    format!("Line {digit}"),
                    "Assets",
                    Selector::new().with_prefix(digit.to_string()),
                    kinds[digit - 1],
                    digit,
                )
            })
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Disjoint rules never fail, and their flattened totals add up to the
    /// signed closing balances of the matched leaves.
    #[test]
    fn prop_partition_sum(
        rows in leaves_strategy(),
        kinds in prop::collection::vec(signed_kind(), 9),
    ) {
        let leaves = LeafSet::new(rows.iter().collect(), true);
        let lines = RuleAggregator::aggregate(&leaves, &disjoint_rules(&kinds)).unwrap();

        let line_total: Decimal = lines.iter().map(|l| l.total()).sum();
        let leaf_total: Decimal = rows.iter().map(LedgerAccount::closing_signed).sum();
        prop_assert_eq!(line_total, leaf_total);

        let mapped: usize = lines.iter().map(|l| l.accounts.len()).sum();
        prop_assert_eq!(mapped, rows.len());

        let config = EngineConfig::default();
        let report = CoverageValidator::new(&config).validate(&leaves, &lines, &[]);
        prop_assert!(report.check("bs_reconciliation").unwrap().passed);
        prop_assert!(report.check("bs_duplicate_mappings").unwrap().passed);
        prop_assert!(report.unmapped_bs.is_empty());
    }

    /// A rule nested inside an earlier one fails, naming exactly the
    /// leaves both select.
    #[test]
    fn prop_overlap_names_every_intersecting_code(
        rows in leaves_strategy(),
        digit in 1u8..=9,
        second in 0u8..=9,
    ) {
        let outer = digit.to_string();
        let inner = format!("{digit}{second}");
        let expected: Vec<AccountCode> = rows
            .iter()
            .filter(|a| a.code.as_str().starts_with(&inner))
            .map(|a| a.code.clone())
            .collect();

        let rules = RuleSet::from_rules(vec![
            MappingRule::new(
                "Outer",
                "Assets",
                Selector::new().with_prefix(outer),
                ComputationKind::ClosingSigned,
                0,
            ),
            MappingRule::new(
                "Inner",
                "Assets",
                Selector::new().with_prefix(inner),
                ComputationKind::ClosingSigned,
                1,
            ),
        ]);
        let leaves = LeafSet::new(rows.iter().collect(), true);
        let result = RuleAggregator::aggregate(&leaves, &rules);

        if expected.is_empty() {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(StatementError::DoubleMapping { rule, codes }) => {
                    prop_assert_eq!(rule, "Inner");
                    prop_assert_eq!(codes, expected);
                }
                other => prop_assert!(false, "expected double mapping, got {:?}", other),
            }
        }
    }

    /// Aggregation is a pure function of its inputs.
    #[test]
    fn prop_deterministic(
        rows in leaves_strategy(),
        kinds in prop::collection::vec(signed_kind(), 9),
    ) {
        let leaves = LeafSet::new(rows.iter().collect(), true);
        let rules = disjoint_rules(&kinds);

        let first = RuleAggregator::aggregate(&leaves, &rules).unwrap();
        let second = RuleAggregator::aggregate(&leaves, &rules).unwrap();
        prop_assert_eq!(first, second);
    }
}
