//! Rule-based aggregation of leaf accounts into statement lines.

use std::collections::BTreeSet;

use ledgermap_shared::error::ConfigError;
use ledgermap_shared::types::AccountCode;
use rust_decimal::Decimal;
use tracing::{debug, error};

use super::error::StatementError;
use super::types::{LineAmount, StatementLine};
use crate::ledger::{LeafSet, LedgerAccount};
use crate::mapping::{ComputationKind, MappingRule, RuleSet, SelectorResolver};

/// Account codes already claimed by earlier rules of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedAccounts(BTreeSet<AccountCode>);

impl MappedAccounts {
    /// Codes of `codes` that are already claimed, in the given order.
    #[must_use]
    pub fn overlap(&self, codes: &[AccountCode]) -> Vec<AccountCode> {
        codes
            .iter()
            .filter(|code| self.0.contains(*code))
            .cloned()
            .collect()
    }

    /// Claims `codes`.
    #[must_use]
    pub fn with(mut self, codes: &[AccountCode]) -> Self {
        self.0.extend(codes.iter().cloned());
        self
    }

    /// Returns true if the code is claimed.
    #[must_use]
    pub fn contains(&self, code: &AccountCode) -> bool {
        self.0.contains(code)
    }

    /// Number of claimed codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Applies ordered rules to the leaves of one period.
pub struct RuleAggregator;

impl RuleAggregator {
    /// Produces one line per rule, in rule order.
    ///
    /// No account ends up under two lines: the first rule that selects an
    /// account already taken aborts the whole run.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::DoubleMapping` naming the rule and every
    /// overlapping code, or `StatementError::Config` when a selector cannot
    /// be applied to these leaves or the leaves carry no closing balance.
    pub fn aggregate(
        leaves: &LeafSet<'_>,
        rules: &RuleSet,
    ) -> Result<Vec<StatementLine>, StatementError> {
        let (mapped, lines) = rules.iter().try_fold(
            (MappedAccounts::default(), Vec::with_capacity(rules.len())),
            |(mapped, mut lines), rule| {
                let (mapped, line) = Self::apply_rule(leaves, rule, mapped)?;
                lines.push(line);
                Ok::<_, StatementError>((mapped, lines))
            },
        )?;

        debug!(
            rules = rules.len(),
            mapped = mapped.len(),
            leaves = leaves.len(),
            "rules aggregated"
        );
        Ok(lines)
    }

    /// Applies one rule on top of the accounts claimed so far.
    ///
    /// # Errors
    ///
    /// See [`RuleAggregator::aggregate`].
    pub fn apply_rule(
        leaves: &LeafSet<'_>,
        rule: &MappingRule,
        mapped: MappedAccounts,
    ) -> Result<(MappedAccounts, StatementLine), StatementError> {
        let matched = SelectorResolver::resolve(leaves, &rule.selector)?;
        if !leaves.has_signed_balance() {
            return Err(ConfigError::MissingBalanceColumn {
                consumer: format!("Rule '{}'", rule.line),
            }
            .into());
        }

        let mut codes: Vec<AccountCode> = Vec::with_capacity(matched.len());
        for account in &matched {
            if !codes.contains(&account.code) {
                codes.push(account.code.clone());
            }
        }

        let overlap = mapped.overlap(&codes);
        if !overlap.is_empty() {
            error!(rule = %rule.line, codes = ?overlap, "double mapping detected");
            return Err(StatementError::DoubleMapping {
                rule: rule.line.clone(),
                codes: overlap,
            });
        }

        let amount = Self::compute_amount(rule.kind, &matched);
        debug!(
            rule = %rule.line,
            kind = %rule.kind,
            matched = codes.len(),
            total = %amount.total(),
            "rule applied"
        );

        let mapped = mapped.with(&codes);
        Ok((
            mapped,
            StatementLine {
                line: rule.line.clone(),
                section: rule.section.clone(),
                amount,
                accounts: codes,
                kind: rule.kind,
                order_index: rule.order_index,
            },
        ))
    }

    /// Computes a line amount from the matched accounts.
    #[must_use]
    pub fn compute_amount(kind: ComputationKind, accounts: &[&LedgerAccount]) -> LineAmount {
        let balances = accounts.iter().map(|a| a.closing_signed());
        let debit_side = || balances.clone().map(|b| b.max(Decimal::ZERO)).sum::<Decimal>();
        let credit_side = || balances.clone().map(|b| b.min(Decimal::ZERO)).sum::<Decimal>();

        match kind {
            ComputationKind::ClosingSigned => LineAmount::single(balances.clone().sum()),
            ComputationKind::ClosingDebit | ComputationKind::TurnoverDebit => {
                LineAmount::single(debit_side())
            }
            ComputationKind::ClosingCredit => LineAmount::single(credit_side()),
            ComputationKind::TurnoverCredit => LineAmount::single(-credit_side()),
            ComputationKind::SeparateNegative => LineAmount::Split {
                positive: debit_side(),
                negative: credit_side(),
            },
        }
    }
}
