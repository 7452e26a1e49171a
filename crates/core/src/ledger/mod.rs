//! Trial-balance rows and their leaf views.
//!
//! This module holds the materialized ledger input of the engine:
//! - Ledger accounts with their named measures
//! - The trial balance table, validated once on construction
//! - Per-period leaf views consumed by selectors and aggregation

pub mod account;
pub mod table;

pub use account::LedgerAccount;
pub use table::{LeafSet, TrialBalance};
