//! Selector-based mapping rules.

use std::fmt;
use std::str::FromStr;

use ledgermap_shared::EngineConfig;
use ledgermap_shared::error::{ConfigError, ConfigResult};
use ledgermap_shared::types::{AccountCode, normalize_key};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::selector::{BalanceFilter, CodeRange, Selector};

/// How a rule turns its matched accounts into an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationKind {
    /// Sum of signed closing balances.
    ClosingSigned,
    /// Sum of the positive part of signed closing balances.
    ClosingDebit,
    /// Sum of the negative part of signed closing balances.
    ClosingCredit,
    /// Positive and negative parts reported separately.
    SeparateNegative,
    /// Same as `ClosingDebit`.
    TurnoverDebit,
    /// Negated `ClosingCredit`: credit movements restated as positive.
    TurnoverCredit,
}

impl ComputationKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::ClosingSigned,
        Self::ClosingDebit,
        Self::ClosingCredit,
        Self::SeparateNegative,
        Self::TurnoverDebit,
        Self::TurnoverCredit,
    ];

    /// Returns the configuration name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClosingSigned => "closing_signed",
            Self::ClosingDebit => "closing_debit",
            Self::ClosingCredit => "closing_credit",
            Self::SeparateNegative => "separate_negative",
            Self::TurnoverDebit => "turnover_debit",
            Self::TurnoverCredit => "turnover_credit",
        }
    }
}

impl fmt::Display for ComputationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| ConfigError::UnsupportedComputationKind(s.to_string()))
    }
}

/// A key as it appears in an external rule table: spreadsheets export
/// account codes both as text and as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawKey {
    /// Textual key.
    Text(String),
    /// Numeric key.
    Number(serde_json::Number),
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl RawKey {
    /// Key text normalized like an account code. A number must be a
    /// non-negative whole value; a spreadsheet-style `.0` is dropped, so
    /// `131.0` becomes `131`. Returns `None` for any other number.
    #[must_use]
    pub fn to_key(&self, digits_only: bool) -> Option<String> {
        match self {
            Self::Text(text) => Some(normalize_key(text, digits_only)),
            Self::Number(number) => {
                let value = Decimal::from_str(&number.to_string()).ok()?;
                (value.fract().is_zero() && !value.is_sign_negative())
                    .then(|| value.trunc().normalize().to_string())
            }
        }
    }
}

/// Unvalidated rule record, the shape of one row of a rule table.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDefinition {
    /// Statement line name.
    pub line: String,
    /// Statement section.
    pub section: String,
    /// Exact codes.
    #[serde(default)]
    pub codes: Vec<RawKey>,
    /// Code prefixes.
    #[serde(default)]
    pub prefixes: Vec<RawKey>,
    /// Inclusive `[low, high]` ranges.
    #[serde(default)]
    pub ranges: Vec<(RawKey, RawKey)>,
    /// `"debit"`, `"credit"`, or absent.
    #[serde(default)]
    pub balance_filter: Option<String>,
    /// Computation kind name.
    pub computation: String,
    /// Explicit position; defaults to the row position.
    #[serde(default)]
    pub order: Option<usize>,
}

/// A validated rule. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    /// Statement line name.
    pub line: String,
    /// Statement section.
    pub section: String,
    /// Which leaves the rule takes.
    pub selector: Selector,
    /// How the amount is computed.
    pub kind: ComputationKind,
    /// Application order, ascending.
    pub order_index: usize,
}

impl MappingRule {
    /// Creates a rule from already-validated parts.
    #[must_use]
    pub fn new(
        line: impl Into<String>,
        section: impl Into<String>,
        selector: Selector,
        kind: ComputationKind,
        order_index: usize,
    ) -> Self {
        Self {
            line: line.into(),
            section: section.into(),
            selector,
            kind,
            order_index,
        }
    }

    /// Validates a raw definition found at `position` in its table. Codes,
    /// prefixes and range bounds are normalized like ledger codes under
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for unknown computation kinds or balance
    /// filters, empty or inverted selectors, blank prefixes, numeric keys
    /// that are not whole non-negative numbers, and ranges with blank bounds.
    pub fn from_definition(
        definition: RuleDefinition,
        position: usize,
        config: &EngineConfig,
    ) -> ConfigResult<Self> {
        let digits_only = config.digits_only_codes;
        let malformed = |reason: String| ConfigError::MalformedSelector {
            rule: definition.line.clone(),
            reason,
        };
        let key = |raw: &RawKey| {
            raw.to_key(digits_only)
                .ok_or_else(|| malformed(format!("key {raw} is not an account code")))
        };

        let kind = ComputationKind::from_str(&definition.computation)?;

        let mut selector = Selector::new();
        for raw in &definition.codes {
            selector = selector.with_code(AccountCode::normalize(&key(raw)?, digits_only)?);
        }
        for raw in &definition.prefixes {
            let prefix = key(raw)?;
            if prefix.is_empty() {
                return Err(malformed("blank prefix".to_string()));
            }
            selector = selector.with_prefix(prefix);
        }
        for (low, high) in &definition.ranges {
            let range = CodeRange::new(&key(low)?, &key(high)?)?;
            if range.is_inverted() {
                return Err(malformed(format!("inverted range [{low}, {high}]")));
            }
            selector = selector.with_range(range);
        }
        if let Some(raw) = definition.balance_filter.as_deref() {
            let filter = BalanceFilter::from_str(raw).map_err(malformed)?;
            selector = selector.with_balance_filter(filter);
        }
        if selector.is_empty() {
            return Err(malformed("no codes, prefixes or ranges".to_string()));
        }

        Ok(Self {
            order_index: definition.order.unwrap_or(position),
            line: definition.line,
            section: definition.section,
            selector,
            kind,
        })
    }
}

/// Rules ordered by ascending `order_index`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<MappingRule>,
}

impl RuleSet {
    /// Orders the rules; ties keep their given order.
    #[must_use]
    pub fn from_rules(mut rules: Vec<MappingRule>) -> Self {
        rules.sort_by_key(|rule| rule.order_index);
        Self { rules }
    }

    /// Validates and orders raw definitions.
    ///
    /// # Errors
    ///
    /// Returns the first definition's `ConfigError`.
    pub fn from_definitions(
        definitions: Vec<RuleDefinition>,
        config: &EngineConfig,
    ) -> ConfigResult<Self> {
        let rules = definitions
            .into_iter()
            .enumerate()
            .map(|(position, definition)| {
                MappingRule::from_definition(definition, position, config)
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self::from_rules(rules))
    }

    /// Parses a JSON array of rule definitions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRuleTable` for malformed JSON and the
    /// validation errors of `from_definitions` otherwise.
    pub fn from_json(json: &str, config: &EngineConfig) -> ConfigResult<Self> {
        let definitions: Vec<RuleDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions, config)
    }

    /// Iterates over the rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = &MappingRule> {
        self.rules.iter()
    }

    /// The rules in application order.
    #[must_use]
    pub fn as_slice(&self) -> &[MappingRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
