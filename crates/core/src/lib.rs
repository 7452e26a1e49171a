//! Chart-of-accounts classification and statement aggregation for Ledgermap.
//!
//! This crate contains pure business logic with ZERO I/O dependencies.
//! Callers hand in materialized trial balances and rule tables and get
//! statement lines and coverage reports back.
//!
//! # Modules
//!
//! - `ledger` - Trial-balance rows and per-period leaf views
//! - `chart` - Leaf detection over prefix-related account codes
//! - `mapping` - Selectors, rule tables and hierarchy-level mapping
//! - `statements` - Rule and hierarchy aggregation into statement lines
//! - `coverage` - Coverage, duplicate and reconciliation checks

pub mod chart;
pub mod coverage;
pub mod ledger;
pub mod mapping;
pub mod statements;

pub use chart::LeafClassifier;
pub use coverage::{CoverageReport, CoverageValidator};
pub use ledger::{LeafSet, LedgerAccount, TrialBalance};
pub use mapping::{HierarchicalMapper, MappingRule, RuleSet, Selector, SelectorResolver};
pub use statements::{RuleAggregator, StatementBuilder, StatementError, StatementLine};
