//! Shared types, errors, and configuration for Ledgermap.
//!
//! This crate provides common types used across all other crates:
//! - Normalized account codes and mapping-sheet prefixes
//! - Ledger measures and statement categories
//! - Decimal tolerance helpers
//! - Configuration errors
//! - Engine configuration

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{ConfigError, ConfigResult};
