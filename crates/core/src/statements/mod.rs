//! Financial statement generation.
//!
//! This module turns leaf accounts into statement lines:
//! - Rule-based aggregation with fail-fast double-mapping detection
//! - Hierarchy-based aggregation as the alternative strategy
//! - Per-period statement building, periods processed in parallel

pub mod aggregator;
pub mod builder;
pub mod error;
pub mod hierarchy;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{MappedAccounts, RuleAggregator};
pub use builder::{PeriodStatements, StatementBuilder};
pub use error::StatementError;
pub use hierarchy::{HierarchyAggregation, HierarchyAggregator};
pub use types::{LineAmount, Statement, StatementLine};
