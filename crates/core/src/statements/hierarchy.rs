//! Hierarchy-based aggregation, the alternative to rule lists.

use std::collections::HashMap;

use ledgermap_shared::error::{ConfigError, ConfigResult};
use ledgermap_shared::types::{AccountCode, Category};
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{LineAmount, StatementLine};
use crate::ledger::LeafSet;
use crate::mapping::{ComputationKind, HierarchicalMapper, MappingTarget};

/// Statement lines produced from hierarchy levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyAggregation {
    /// Lines fed by BS leaves.
    pub balance_sheet: Vec<StatementLine>,
    /// Lines fed by PL leaves.
    pub income_statement: Vec<StatementLine>,
    /// Leaves no level resolved.
    pub unmapped: Vec<AccountCode>,
}

/// Accumulates lines keyed by (section, line) in first-seen order.
#[derive(Default)]
struct LineAccumulator {
    lines: Vec<StatementLine>,
    index: HashMap<(String, String), usize>,
}

impl LineAccumulator {
    fn add(&mut self, target: &MappingTarget, code: &AccountCode, balance: Decimal) {
        let key = (target.section.clone(), target.line.clone());
        let next = self.lines.len();
        let idx = *self.index.entry(key).or_insert(next);
        if idx == next {
            self.lines.push(StatementLine {
                line: target.line.clone(),
                section: target.section.clone(),
                amount: LineAmount::single(Decimal::ZERO),
                accounts: Vec::new(),
                kind: ComputationKind::ClosingSigned,
                order_index: next,
            });
        }

        let line = &mut self.lines[idx];
        line.amount = LineAmount::single(line.amount.total() + balance);
        if !line.accounts.contains(code) {
            line.accounts.push(code.clone());
        }
    }
}

/// Resolves every leaf once through a [`HierarchicalMapper`].
pub struct HierarchyAggregator;

impl HierarchyAggregator {
    /// Groups the leaves of one period into statement lines.
    ///
    /// Each leaf resolves to at most one target, so no account can appear
    /// under two lines.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingBalanceColumn` if the leaves carry no
    /// closing balance.
    pub fn aggregate(
        leaves: &LeafSet<'_>,
        mapper: &HierarchicalMapper,
    ) -> ConfigResult<HierarchyAggregation> {
        if !leaves.has_signed_balance() {
            return Err(ConfigError::MissingBalanceColumn {
                consumer: "Hierarchy mapping".to_string(),
            });
        }

        let mut balance_sheet = LineAccumulator::default();
        let mut income_statement = LineAccumulator::default();
        let mut unmapped = Vec::new();

        for account in leaves.iter() {
            let Some(resolution) = mapper.resolve(&account.code) else {
                unmapped.push(account.code.clone());
                continue;
            };

            let statement = match account.category {
                Category::BalanceSheet => &mut balance_sheet,
                Category::ProfitAndLoss => &mut income_statement,
            };
            statement.add(resolution.target, &account.code, account.closing_signed());
        }

        debug!(
            bs_lines = balance_sheet.lines.len(),
            is_lines = income_statement.lines.len(),
            unmapped = unmapped.len(),
            "hierarchy aggregated"
        );

        Ok(HierarchyAggregation {
            balance_sheet: balance_sheet.lines,
            income_statement: income_statement.lines,
            unmapped,
        })
    }
}
