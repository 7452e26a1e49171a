//! Rule configuration and account-to-line resolution.
//!
//! Two alternative strategies resolve leaf accounts to statement lines:
//! - Selector-based rules (`selector`, `rules`): ordered rule lists whose
//!   selectors combine explicit codes, prefixes and ranges
//! - Hierarchy levels (`hierarchy`): exact-then-longest-prefix lookup over
//!   mapping tables organized by account depth

pub mod hierarchy;
pub mod rules;
pub mod selector;

pub use hierarchy::{
    AmbiguousKey, HierarchicalMapper, HierarchyLevel, MappingTarget, MatchKind, Resolution,
    SheetRow,
};
pub use rules::{ComputationKind, MappingRule, RawKey, RuleDefinition, RuleSet};
pub use selector::{BalanceFilter, CodeRange, Selector, SelectorResolver};
