//! Implicit chart-of-accounts structure.
//!
//! Trial balances list parent and child accounts side by side; only the
//! terminal ("leaf") accounts may be mapped to statement lines, otherwise a
//! parent's balance would be counted again on top of its children.

pub mod leaf;

#[cfg(test)]
mod leaf_props;

pub use leaf::LeafClassifier;
