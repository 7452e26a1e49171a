//! Common types used across the engine.

pub mod amount;
pub mod code;
pub mod measure;

pub use amount::{approx_eq, difference};
pub use code::{AccountCode, normalize_key, normalize_prefix};
pub use measure::{Category, Measure};
