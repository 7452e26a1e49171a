//! Hierarchy-level mapping with exact-then-longest-prefix resolution.
//!
//! Mapping sheets are often organized by account depth (first-level,
//! second-level, sub-accounts) rather than as selector lists. Levels are
//! consulted from the most granular to the coarsest; within a level an exact
//! key beats any prefix, and the longest matching prefix beats shorter ones.

use std::collections::HashMap;

use ledgermap_shared::types::{AccountCode, normalize_prefix};
use serde::{Deserialize, Serialize};

/// The statement line an account resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingTarget {
    /// Item on the financial statements.
    pub line: String,
    /// Leadsheet / section the item belongs to.
    pub section: String,
    /// Financial-statement code, if the sheet provides one.
    #[serde(default)]
    pub fs_code: Option<String>,
}

impl MappingTarget {
    /// Creates a target without an FS code.
    #[must_use]
    pub fn new(line: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            section: section.into(),
            fs_code: None,
        }
    }

    /// Sets the FS code.
    #[must_use]
    pub fn with_fs_code(mut self, fs_code: impl Into<String>) -> Self {
        self.fs_code = Some(fs_code.into());
        self
    }
}

/// One row of a mapping spreadsheet.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetRow {
    /// Account key as exported (may look like `"131.0"`).
    pub key: String,
    /// Leadsheet name.
    pub leadsheet: String,
    /// Item on the financial statements.
    pub item: String,
    /// FS code.
    #[serde(default)]
    pub fs_code: Option<String>,
}

/// How a key matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The (truncated) code equals the key.
    Exact,
    /// The key is the longest prefix of the (truncated) code.
    Prefix,
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Name of the level that matched.
    pub level: &'a str,
    /// The key that matched.
    pub key: &'a str,
    /// Exact or prefix match.
    pub kind: MatchKind,
    /// First target configured for the key.
    pub target: &'a MappingTarget,
}

/// A key configured with more than one distinct target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousKey {
    /// Level name.
    pub level: String,
    /// The key.
    pub key: String,
    /// Distinct targets, first-seen order. Only the first one is used.
    pub targets: Vec<MappingTarget>,
}

/// One granularity level of a mapping table.
#[derive(Debug, Clone, Default)]
pub struct HierarchyLevel {
    name: String,
    truncate: Option<usize>,
    keys: Vec<String>,
    entries: HashMap<String, Vec<MappingTarget>>,
}

impl HierarchyLevel {
    /// Creates an empty level. With `truncate`, codes are cut to that many
    /// characters before lookup.
    #[must_use]
    pub fn new(name: impl Into<String>, truncate: Option<usize>) -> Self {
        Self {
            name: name.into(),
            truncate,
            keys: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Builds a level from spreadsheet rows. Rows whose key normalizes to
    /// nothing are skipped.
    #[must_use]
    pub fn from_sheet_rows(
        name: impl Into<String>,
        truncate: Option<usize>,
        rows: impl IntoIterator<Item = SheetRow>,
    ) -> Self {
        let mut level = Self::new(name, truncate);
        for row in rows {
            let Some(key) = normalize_prefix(&row.key) else {
                continue;
            };
            let target = MappingTarget {
                line: row.item.trim().to_string(),
                section: row.leadsheet.trim().to_string(),
                fs_code: row
                    .fs_code
                    .map(|code| code.trim().to_string())
                    .filter(|code| !code.is_empty()),
            };
            level.insert(key, target);
        }
        level
    }

    /// Appends a target to a key. The first target of a key wins.
    pub fn insert(&mut self, key: impl Into<String>, target: MappingTarget) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.entries.entry(key).or_default().push(target);
    }

    /// Adds a target, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, target: MappingTarget) -> Self {
        self.insert(key, target);
        self
    }

    /// Level name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Truncation length.
    #[must_use]
    pub const fn truncate(&self) -> Option<usize> {
        self.truncate
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the level has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Targets configured for a key, in insertion order.
    #[must_use]
    pub fn targets(&self, key: &str) -> Option<&[MappingTarget]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Looks a code up in this level only.
    #[must_use]
    pub fn resolve(&self, code: &AccountCode) -> Option<Resolution<'_>> {
        let candidate = self.truncate.map_or(code.as_str(), |len| code.truncate(len));

        if let Some((key, targets)) = self.entries.get_key_value(candidate) {
            return Some(self.resolution(key, MatchKind::Exact, targets));
        }

        // Keys are unique, so walking prefixes from longest to shortest
        // finds the longest match first.
        candidate
            .char_indices()
            .map(|(idx, _)| idx)
            .filter(|&idx| idx > 0)
            .rev()
            .find_map(|idx| self.entries.get_key_value(&candidate[..idx]))
            .map(|(key, targets)| self.resolution(key, MatchKind::Prefix, targets))
    }

    fn resolution<'a>(
        &'a self,
        key: &'a str,
        kind: MatchKind,
        targets: &'a [MappingTarget],
    ) -> Resolution<'a> {
        Resolution {
            level: &self.name,
            key,
            kind,
            target: &targets[0],
        }
    }

    /// Keys configured with more than one distinct target.
    #[must_use]
    pub fn ambiguous_keys(&self) -> Vec<AmbiguousKey> {
        self.keys
            .iter()
            .filter_map(|key| {
                let mut distinct: Vec<MappingTarget> = Vec::new();
                for target in &self.entries[key] {
                    if !distinct.contains(target) {
                        distinct.push(target.clone());
                    }
                }
                (distinct.len() > 1).then(|| AmbiguousKey {
                    level: self.name.clone(),
                    key: key.clone(),
                    targets: distinct,
                })
            })
            .collect()
    }
}

/// Resolves codes across levels ordered from most granular to coarsest.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalMapper {
    levels: Vec<HierarchyLevel>,
}

impl HierarchicalMapper {
    /// Creates a mapper; `levels` must be ordered most granular first.
    #[must_use]
    pub fn new(levels: Vec<HierarchyLevel>) -> Self {
        Self { levels }
    }

    /// The levels in priority order.
    #[must_use]
    pub fn levels(&self) -> &[HierarchyLevel] {
        &self.levels
    }

    /// Returns the first level's match, or `None` when no level matches.
    #[must_use]
    pub fn resolve(&self, code: &AccountCode) -> Option<Resolution<'_>> {
        self.levels.iter().find_map(|level| level.resolve(code))
    }

    /// Ambiguous keys of every level.
    #[must_use]
    pub fn ambiguous_keys(&self) -> Vec<AmbiguousKey> {
        self.levels
            .iter()
            .flat_map(HierarchyLevel::ambiguous_keys)
            .collect()
    }
}
