//! Normalized account codes.
//!
//! Hierarchy in a chart of accounts is implicit: `"131"` is a child of `"13"`
//! because it starts with it. Every ordering and matching rule in the engine
//! is therefore defined on the string form, never on the numeric value.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// A normalized ledger account code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountCode(String);

impl AccountCode {
    /// Normalizes a raw code: trims it and removes every space. With
    /// `digits_only`, every non-digit character is dropped as well.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyAccountCode` if nothing is left.
    pub fn normalize(raw: &str, digits_only: bool) -> ConfigResult<Self> {
        let text = normalize_key(raw, digits_only);
        if text.is_empty() {
            return Err(ConfigError::EmptyAccountCode(raw.to_string()));
        }
        Ok(Self(text))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `other` starts with this code (equality included).
    #[must_use]
    pub fn is_prefix_of(&self, other: &str) -> bool {
        other.starts_with(self.as_str())
    }

    /// Returns true if this code is a proper extension of `parent`.
    #[must_use]
    pub fn extends(&self, parent: &str) -> bool {
        self.0 != parent && self.0.starts_with(parent)
    }

    /// Returns the first `len` characters, or the whole code when shorter.
    #[must_use]
    pub fn truncate(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Interprets the code as a number, if it is one.
    #[must_use]
    pub fn as_numeric(&self) -> Option<Decimal> {
        Decimal::from_str(&self.0).ok()
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountCode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s, false)
    }
}

impl AsRef<str> for AccountCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Applies account-code normalization to a prefix or range bound, so rule
/// keys compare against codes on equal terms. May return an empty string.
#[must_use]
pub fn normalize_key(raw: &str, digits_only: bool) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace())
        .filter(|ch| !digits_only || ch.is_ascii_digit())
        .collect()
}

/// Normalizes a key exported from a mapping spreadsheet.
///
/// Spreadsheets hand numeric keys back as `"131.0"`; everything from the
/// first `.` on is dropped and only digits are kept. Returns `None` when
/// nothing is left, so callers can skip the row.
#[must_use]
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let text = raw.trim();
    let head = text.split_once('.').map_or(text, |(head, _)| head);
    let digits: String = head.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() { None } else { Some(digits) }
}

#[cfg(test)]
#[path = "code_tests.rs"]
mod tests;
