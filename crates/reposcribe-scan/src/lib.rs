//! Candidate discovery for reposcribe
//!
//! Three stages run over a materialized checkout: the scanner walks the tree
//! and applies exclusion rules, the classifier partitions survivors into
//! priority tiers, and the tree renderer produces the structural listing
//! that heads the context document.

mod classify;
mod scanner;
mod tree;

pub use classify::{HIGH_VALUE_NAMES, LOW_VALUE_DIRS, TieredCandidates, classify, tier_of};
pub use scanner::{SKIP_DIRS, SKIP_SUFFIXES, Scanner};
pub use tree::render_tree;
