//! Coverage and reconciliation checks.
//!
//! Validation never fails: every irregularity becomes a failed check in the
//! report so the caller can inspect and remediate it.

pub mod types;
pub mod validator;

pub use types::{AccountCoverage, CoverageCheck, CoverageReport, DuplicateMapping, SectionRole};
pub use validator::CoverageValidator;
