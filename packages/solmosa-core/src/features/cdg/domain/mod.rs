//! CDG domain types

mod edge;
mod graph;
mod node;
mod predicate;

pub use edge::CompactEdge;
pub use graph::{CdgSummary, CompactGraph, ControlDependencyGraph, EdgeSummary, NodeSummary};
pub use node::{CompactNode, NodeId, NodeIdx};
pub use predicate::{Predicate, PredicateKind};
