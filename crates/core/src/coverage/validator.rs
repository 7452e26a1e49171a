//! Cross-checks generated statements against their source leaves.

use std::collections::{HashMap, HashSet};

use ledgermap_shared::EngineConfig;
use ledgermap_shared::types::{AccountCode, Category, approx_eq, difference};
use rust_decimal::Decimal;
use tracing::warn;

use super::types::{AccountCoverage, CoverageCheck, CoverageReport, DuplicateMapping, SectionRole};
use crate::ledger::{LeafSet, LedgerAccount};
use crate::statements::{Statement, StatementLine};

/// Validates the statements of one period.
pub struct CoverageValidator<'a> {
    config: &'a EngineConfig,
}

impl<'a> CoverageValidator<'a> {
    /// Creates a validator using the configured tolerance and reserved
    /// retained-earnings prefix.
    #[must_use]
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Runs every check. Never fails; irregularities become failed checks.
    #[must_use]
    pub fn validate(
        &self,
        leaves: &LeafSet<'_>,
        balance_sheet: &[StatementLine],
        income_statement: &[StatementLine],
    ) -> CoverageReport {
        let bs_codes = mapped_codes(balance_sheet);
        let is_codes = mapped_codes(income_statement);

        let accounts: Vec<AccountCoverage> = leaves
            .iter()
            .map(|account| AccountCoverage {
                code: account.code.clone(),
                category: account.category,
                mapped_bs: bs_codes.contains(&account.code),
                mapped_pl: is_codes.contains(&account.code),
            })
            .collect();

        let unmapped_bs = distinct_codes(
            accounts
                .iter()
                .filter(|a| a.category == Category::BalanceSheet && !a.mapped_bs),
        );
        let unmapped_pl = distinct_codes(
            accounts
                .iter()
                .filter(|a| a.category == Category::ProfitAndLoss && !a.mapped_pl),
        );
        let overlapping = distinct_codes(accounts.iter().filter(|a| a.mapped_bs && a.mapped_pl));

        let bs_duplicates = duplicate_mappings(Statement::BalanceSheet, balance_sheet);
        let is_duplicates = duplicate_mappings(Statement::IncomeStatement, income_statement);

        let mut checks = vec![
            count_check("bs_unmapped_leaves", unmapped_bs.len()),
            count_check("pl_unmapped_leaves", unmapped_pl.len()),
            count_check("bs_duplicate_mappings", bs_duplicates.len()),
            count_check("is_duplicate_mappings", is_duplicates.len()),
            count_check("statement_disjointness", overlapping.len()),
        ];
        checks.push(self.balance_equation(balance_sheet));
        checks.push(self.bs_reconciliation(leaves, balance_sheet, &bs_codes));
        checks.push(self.net_income_reconciliation(leaves, income_statement));
        checks.push(self.retained_earnings_presence(leaves, &bs_codes));

        for check in checks.iter().filter(|c| !c.passed) {
            warn!(
                check = %check.name,
                difference = %check.difference,
                "coverage check failed"
            );
        }

        CoverageReport {
            checks,
            accounts,
            unmapped_bs,
            unmapped_pl,
            duplicates: bs_duplicates.into_iter().chain(is_duplicates).collect(),
            overlapping,
        }
    }

    /// Assets ≈ liabilities + equity, grouping lines by section role.
    fn balance_equation(&self, balance_sheet: &[StatementLine]) -> CoverageCheck {
        let mut totals: HashMap<SectionRole, Decimal> = HashMap::new();
        for line in balance_sheet {
            *totals
                .entry(SectionRole::from_section(&line.section))
                .or_default() += line.total();
        }
        let total_for = |role: SectionRole| totals.get(&role).copied().unwrap_or_default();

        let assets = total_for(SectionRole::Assets);
        let funding = total_for(SectionRole::Liabilities) + total_for(SectionRole::Equity);
        CoverageCheck::new(
            "balance_equation",
            approx_eq(assets, funding, self.config.tolerance),
            difference(assets, funding),
        )
    }

    /// Σ balance-sheet lines ≈ Σ signed closing balances of mapped BS leaves.
    fn bs_reconciliation(
        &self,
        leaves: &LeafSet<'_>,
        balance_sheet: &[StatementLine],
        bs_codes: &HashSet<&AccountCode>,
    ) -> CoverageCheck {
        let mapped_total: Decimal = balance_sheet.iter().map(StatementLine::ledger_total).sum();
        let source_total: Decimal = leaves
            .iter()
            .filter(|a| a.category == Category::BalanceSheet && bs_codes.contains(&a.code))
            .map(LedgerAccount::closing_signed)
            .sum();

        CoverageCheck::new(
            "bs_reconciliation",
            approx_eq(mapped_total, source_total, self.config.tolerance),
            difference(mapped_total, source_total),
        )
    }

    /// Net income from the income statement ≈ -Σ signed closing balances of
    /// every PL leaf. Credit contributions count as income.
    fn net_income_reconciliation(
        &self,
        leaves: &LeafSet<'_>,
        income_statement: &[StatementLine],
    ) -> CoverageCheck {
        let net_income: Decimal = -income_statement
            .iter()
            .map(StatementLine::ledger_total)
            .sum::<Decimal>();
        let expected = -leaves.closing_total(Category::ProfitAndLoss);

        CoverageCheck::new(
            "net_income_reconciliation",
            approx_eq(net_income, expected, self.config.tolerance),
            difference(net_income, expected),
        )
    }

    /// Reserved retained-earnings accounts mapped into the balance sheet must
    /// carry a balance.
    fn retained_earnings_presence(
        &self,
        leaves: &LeafSet<'_>,
        bs_codes: &HashSet<&AccountCode>,
    ) -> CoverageCheck {
        let prefix = self.config.retained_earnings_prefix.as_str();
        let balance: Decimal = leaves
            .iter()
            .filter(|a| a.code.as_str().starts_with(prefix) && bs_codes.contains(&a.code))
            .map(LedgerAccount::closing_signed)
            .sum();

        CoverageCheck::new("retained_earnings_presence", !balance.is_zero(), balance)
    }
}

fn mapped_codes(lines: &[StatementLine]) -> HashSet<&AccountCode> {
    lines.iter().flat_map(|line| line.accounts.iter()).collect()
}

fn distinct_codes<'a>(accounts: impl Iterator<Item = &'a AccountCoverage>) -> Vec<AccountCode> {
    let mut codes: Vec<AccountCode> = Vec::new();
    for account in accounts {
        if !codes.contains(&account.code) {
            codes.push(account.code.clone());
        }
    }
    codes
}

fn count_check(name: &str, offending: usize) -> CoverageCheck {
    CoverageCheck::new(name, offending == 0, Decimal::from(offending))
}

/// Codes listed under more than one distinct line name, in first-seen order.
fn duplicate_mappings(statement: Statement, lines: &[StatementLine]) -> Vec<DuplicateMapping> {
    let mut order: Vec<&AccountCode> = Vec::new();
    let mut owners: HashMap<&AccountCode, Vec<String>> = HashMap::new();

    for line in lines {
        for code in &line.accounts {
            let names = owners.entry(code).or_insert_with(|| {
                order.push(code);
                Vec::new()
            });
            if !names.contains(&line.line) {
                names.push(line.line.clone());
            }
        }
    }

    order
        .into_iter()
        .filter_map(|code| {
            let names = owners.remove(code)?;
            (names.len() > 1).then(|| DuplicateMapping {
                code: code.clone(),
                statement,
                lines: names,
            })
        })
        .collect()
}
