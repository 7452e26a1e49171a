//! Property-based tests for leaf classification.
//!
//! The sorted scan must agree with the pairwise reference check on every
//! input, including duplicated codes.

use proptest::prelude::*;

use super::leaf::LeafClassifier;

/// Strategy for code lists drawn from a small alphabet so prefix relations
/// and exact duplicates are frequent.
fn code_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[1-3]{1,4}", 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The optimized classifier matches the O(n^2) oracle.
    #[test]
    fn prop_sorted_scan_matches_oracle(codes in code_list()) {
        prop_assert_eq!(
            LeafClassifier::classify(&codes),
            LeafClassifier::classify_exhaustive(&codes)
        );
    }

    /// Leaf status does not depend on input order.
    #[test]
    fn prop_order_independent(codes in code_list().prop_shuffle()) {
        let flags = LeafClassifier::classify(&codes);
        let mut sorted: Vec<(String, bool)> = codes.into_iter().zip(flags).collect();
        sorted.sort();

        let sorted_codes: Vec<String> = sorted.iter().map(|(c, _)| c.clone()).collect();
        let expected: Vec<bool> = sorted.iter().map(|(_, leaf)| *leaf).collect();
        prop_assert_eq!(LeafClassifier::classify(&sorted_codes), expected);
    }

    /// Grouped classification equals classifying each group on its own.
    #[test]
    fn prop_grouped_matches_per_group(
        rows in prop::collection::vec((0u8..3, "[1-3]{1,3}"), 0..40),
    ) {
        let grouped = LeafClassifier::classify_grouped(&rows);

        for group in 0u8..3 {
            let indices: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].0 == group).collect();
            let codes: Vec<&str> = indices.iter().map(|&i| rows[i].1.as_str()).collect();
            let expected = LeafClassifier::classify_exhaustive(&codes);
            for (&idx, leaf) in indices.iter().zip(expected) {
                prop_assert_eq!(grouped[idx], leaf);
            }
        }
    }
}
