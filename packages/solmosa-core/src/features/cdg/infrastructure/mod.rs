//! CDG construction passes

pub mod compaction;
pub mod dominator;
pub mod errors;
pub mod predicate_extraction;
pub mod revert_elimination;

pub use compaction::compact_methods;
pub use dominator::{DominatorAnalyzer, DominatorTree, LengauerTarjan};
pub use errors::{CdgError, CdgResult};
pub use predicate_extraction::extract_predicate;
pub use revert_elimination::eliminate_revert_nodes;
