//! Control-dependency graph
//!
//! Compacts the recovered CFG into branch-relevant nodes, drops
//! compiler-injected revert stubs, computes immediate dominators with
//! Lengauer–Tarjan and rewrites the edge set as dominator edges annotated
//! with the controlling comparison.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{build_cdg, BuildCdgUseCase};
pub use domain::{
    CdgSummary, CompactEdge, CompactGraph, CompactNode, ControlDependencyGraph, NodeId, NodeIdx,
    Predicate, PredicateKind,
};
pub use infrastructure::errors::CdgError;
pub use infrastructure::{compact_methods, eliminate_revert_nodes, extract_predicate, DominatorAnalyzer, LengauerTarjan};
