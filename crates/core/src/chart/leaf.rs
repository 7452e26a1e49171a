//! Leaf detection over prefix-related account codes.

use std::collections::HashMap;
use std::hash::Hash;

/// Determines which account codes are terminal nodes of their group.
///
/// A code is a leaf iff no other code in the same group is a proper
/// extension of it (`other != code && other.starts_with(code)`). Codes that
/// are byte-identical do not count as extensions of each other.
pub struct LeafClassifier;

impl LeafClassifier {
    /// Returns one leaf flag per input code, in input order.
    ///
    /// Runs in O(n log n): after sorting, every extension of a code sorts
    /// directly behind it, so only the next distinct code needs checking.
    #[must_use]
    pub fn classify<S: AsRef<str>>(codes: &[S]) -> Vec<bool> {
        let mut distinct: Vec<&str> = codes.iter().map(AsRef::as_ref).collect();
        distinct.sort_unstable();
        distinct.dedup();

        let distinct_leaf: Vec<bool> = distinct
            .iter()
            .enumerate()
            .map(|(idx, code)| {
                distinct
                    .get(idx + 1)
                    .is_none_or(|next| !next.starts_with(code))
            })
            .collect();

        codes
            .iter()
            .map(|code| {
                distinct
                    .binary_search(&code.as_ref())
                    .is_ok_and(|idx| distinct_leaf[idx])
            })
            .collect()
    }

    /// Pairwise reference check, O(n^2). Kept as the oracle the sorted scan
    /// is validated against.
    #[must_use]
    pub fn classify_exhaustive<S: AsRef<str>>(codes: &[S]) -> Vec<bool> {
        codes
            .iter()
            .map(|code| {
                let code = code.as_ref();
                !codes.iter().any(|other| {
                    let other = other.as_ref();
                    other != code && other.starts_with(code)
                })
            })
            .collect()
    }

    /// Classifies `(group, code)` pairs, comparing codes only within their
    /// group. Flags are returned in input order.
    #[must_use]
    pub fn classify_grouped<K, S>(rows: &[(K, S)]) -> Vec<bool>
    where
        K: Eq + Hash,
        S: AsRef<str>,
    {
        let mut groups: HashMap<&K, Vec<usize>> = HashMap::new();
        for (idx, (key, _)) in rows.iter().enumerate() {
            groups.entry(key).or_default().push(idx);
        }

        let mut flags = vec![true; rows.len()];
        for indices in groups.values() {
            let codes: Vec<&str> = indices.iter().map(|&i| rows[i].1.as_ref()).collect();
            for (&idx, is_leaf) in indices.iter().zip(Self::classify(&codes)) {
                flags[idx] = is_leaf;
            }
        }
        flags
    }
}
