//! Per-period statement building.

use ledgermap_shared::EngineConfig;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use super::aggregator::RuleAggregator;
use super::error::StatementError;
use super::hierarchy::HierarchyAggregator;
use super::types::StatementLine;
use crate::coverage::{CoverageReport, CoverageValidator};
use crate::ledger::TrialBalance;
use crate::mapping::{HierarchicalMapper, RuleSet};

/// Statements and coverage of one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStatements {
    /// The period (grouping key).
    pub period: String,
    /// Balance-sheet lines in rule order.
    pub balance_sheet: Vec<StatementLine>,
    /// Income-statement lines in rule order.
    pub income_statement: Vec<StatementLine>,
    /// Validation of both statements.
    pub coverage: CoverageReport,
}

/// How leaves are resolved to statement lines.
#[derive(Clone, Copy)]
enum Strategy<'a> {
    Rules {
        balance_sheet: &'a RuleSet,
        income_statement: &'a RuleSet,
    },
    Hierarchy(&'a HierarchicalMapper),
}

/// Builds balance sheet, income statement and coverage report per period.
pub struct StatementBuilder<'a> {
    config: &'a EngineConfig,
    strategy: Strategy<'a>,
}

impl<'a> StatementBuilder<'a> {
    /// Creates a builder over fixed rule sets.
    #[must_use]
    pub const fn new(
        config: &'a EngineConfig,
        bs_rules: &'a RuleSet,
        is_rules: &'a RuleSet,
    ) -> Self {
        Self {
            config,
            strategy: Strategy::Rules {
                balance_sheet: bs_rules,
                income_statement: is_rules,
            },
        }
    }

    /// Creates a builder that resolves leaves through hierarchy levels
    /// instead of rule lists.
    #[must_use]
    pub const fn from_hierarchy(config: &'a EngineConfig, mapper: &'a HierarchicalMapper) -> Self {
        Self {
            config,
            strategy: Strategy::Hierarchy(mapper),
        }
    }

    /// Builds one period.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::UnknownPeriod` if the period has no rows, and
    /// any aggregation error of either statement.
    pub fn build_period(
        &self,
        trial_balance: &TrialBalance,
        period: &str,
    ) -> Result<PeriodStatements, StatementError> {
        if !trial_balance.periods().iter().any(|p| p == period) {
            return Err(StatementError::UnknownPeriod(period.to_string()));
        }

        let leaves = trial_balance.leaves(period);
        let (balance_sheet, income_statement) = match self.strategy {
            Strategy::Rules {
                balance_sheet,
                income_statement,
            } => (
                RuleAggregator::aggregate(&leaves, balance_sheet)?,
                RuleAggregator::aggregate(&leaves, income_statement)?,
            ),
            Strategy::Hierarchy(mapper) => {
                let aggregation = HierarchyAggregator::aggregate(&leaves, mapper)?;
                (aggregation.balance_sheet, aggregation.income_statement)
            }
        };
        let coverage = CoverageValidator::new(self.config).validate(
            &leaves,
            &balance_sheet,
            &income_statement,
        );

        info!(
            period,
            leaves = leaves.len(),
            bs_lines = balance_sheet.len(),
            is_lines = income_statement.len(),
            failed_checks = coverage.failed_checks().count(),
            "period statements built"
        );

        Ok(PeriodStatements {
            period: period.to_string(),
            balance_sheet,
            income_statement,
            coverage,
        })
    }

    /// Builds every period of the trial balance. Periods share no state and
    /// run in parallel; results keep the periods' first-seen order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing period, in period order.
    pub fn build_all(
        &self,
        trial_balance: &TrialBalance,
    ) -> Result<Vec<PeriodStatements>, StatementError> {
        let results: Vec<Result<PeriodStatements, StatementError>> = trial_balance
            .periods()
            .par_iter()
            .map(|period| self.build_period(trial_balance, period))
            .collect();

        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerAccount;
    use crate::mapping::{ComputationKind, HierarchyLevel, MappingRule, MappingTarget, Selector};
    use ledgermap_shared::types::{AccountCode, Category, Measure};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn row(code: &str, category: Category, period: &str, balance: Decimal) -> LedgerAccount {
        LedgerAccount::new(code.parse().unwrap(), code, category, period)
            .with_closing_balance(balance)
    }

    fn trial_balance() -> TrialBalance {
        TrialBalance::new(
            [Measure::ClosingDebit, Measure::ClosingCredit],
            vec![
                row("111", Category::BalanceSheet, "2024", dec!(500)),
                row("1111", Category::BalanceSheet, "2024", dec!(500)),
                row("5111", Category::ProfitAndLoss, "2024", dec!(-200)),
                row("1111", Category::BalanceSheet, "2025", dec!(650)),
                row("5111", Category::ProfitAndLoss, "2025", dec!(-350)),
            ],
        )
        .unwrap()
    }

    fn rules(line: &str, section: &str, prefix: &str, kind: ComputationKind) -> RuleSet {
        RuleSet::from_rules(vec![MappingRule::new(
            line,
            section,
            Selector::new().with_prefix(prefix),
            kind,
            0,
        )])
    }

    #[test]
    fn test_build_all_keeps_period_order() {
        let config = EngineConfig::default();
        let bs = rules("Cash", "Current assets", "11", ComputationKind::ClosingSigned);
        let is = rules("Revenue", "Income", "51", ComputationKind::TurnoverCredit);
        let tb = trial_balance();

        let periods = StatementBuilder::new(&config, &bs, &is).build_all(&tb).unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].period, "2024");
        assert_eq!(periods[0].balance_sheet[0].total(), dec!(500));
        assert_eq!(periods[0].income_statement[0].total(), dec!(200));
        assert_eq!(periods[1].period, "2025");
        assert_eq!(periods[1].balance_sheet[0].total(), dec!(650));
        assert!(periods[0].coverage.check("bs_reconciliation").unwrap().passed);
        assert!(periods[1].coverage.check("net_income_reconciliation").unwrap().passed);
    }

    #[test]
    fn test_hierarchy_strategy_feeds_coverage() {
        let config = EngineConfig::default();
        let mapper = HierarchicalMapper::new(vec![
            HierarchyLevel::new("first", Some(3))
                .with("111", MappingTarget::new("Cash", "Current assets")),
        ]);
        let tb = trial_balance();

        let periods = StatementBuilder::from_hierarchy(&config, &mapper)
            .build_all(&tb)
            .unwrap();

        assert_eq!(periods[0].balance_sheet[0].total(), dec!(500));
        assert!(periods[0].income_statement.is_empty());
        let coverage = &periods[0].coverage;
        assert!(coverage.check("bs_reconciliation").unwrap().passed);
        assert_eq!(coverage.unmapped_pl, vec!["5111".parse::<AccountCode>().unwrap()]);
        assert!(!coverage.check("net_income_reconciliation").unwrap().passed);
    }

    #[test]
    fn test_unknown_period() {
        let config = EngineConfig::default();
        let bs = RuleSet::default();
        let is = RuleSet::default();
        let tb = trial_balance();

        let err = StatementBuilder::new(&config, &bs, &is)
            .build_period(&tb, "2030")
            .unwrap_err();
        assert!(matches!(err, StatementError::UnknownPeriod(p) if p == "2030"));
    }

    #[test]
    fn test_build_all_surfaces_double_mapping() {
        let config = EngineConfig::default();
        let bs = RuleSet::from_rules(vec![
            MappingRule::new(
                "Cash",
                "Current assets",
                Selector::new().with_prefix("1"),
                ComputationKind::ClosingSigned,
                0,
            ),
            MappingRule::new(
                "Cash at bank",
                "Current assets",
                Selector::new().with_prefix("111"),
                ComputationKind::ClosingSigned,
                1,
            ),
        ]);
        let is = RuleSet::default();
        let tb = trial_balance();

        let err = StatementBuilder::new(&config, &bs, &is)
            .build_all(&tb)
            .unwrap_err();
        assert_eq!(err.error_code(), "DOUBLE_MAPPING");
    }
}
