//! Tolerance helpers for decimal amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.

use rust_decimal::Decimal;

/// Signed difference `left - right`.
#[must_use]
pub fn difference(left: Decimal, right: Decimal) -> Decimal {
    left - right
}

/// Returns true if `|left - right| <= tolerance`.
#[must_use]
pub fn approx_eq(left: Decimal, right: Decimal, tolerance: Decimal) -> bool {
    difference(left, right).abs() <= tolerance
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;
