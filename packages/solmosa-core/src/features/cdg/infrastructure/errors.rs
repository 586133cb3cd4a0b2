/*
 * CDG Error Types
 *
 * Every variant is a structural-assumption violation: the compiled shape of
 * the contract falls outside what the compaction and dominator passes
 * support. None of them is retried.
 */

use std::fmt;

/// CDG construction error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdgError {
    /// CFG without any basic block
    EmptyGraph,

    /// Blocks left over that no seed rule can reach
    UnassignedBlocks { method: String, remaining: usize },

    /// A recorded successor pc does not start any compact node
    MissingEdgeTarget { node: String, pc: usize },

    /// Revert elimination met a node with the wrong in/out-degree
    MergeShape {
        node: String,
        outgoing: usize,
        incoming: usize,
    },

    /// No unique node to start the dominator DFS from
    AmbiguousRoot { candidates: Vec<String> },

    /// Node not reachable from the root
    UnreachableNode { node: String },

    /// DFS tree edge recorded on the parent but not in the child's predecessors
    MissingTreeEdge { parent: String, child: String },

    /// Non-root node left without an immediate dominator
    MissingDominator { node: String },
}

impl fmt::Display for CdgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdgError::EmptyGraph => write!(f, "control-flow graph has no basic blocks"),
            CdgError::UnassignedBlocks { method, remaining } => {
                write!(
                    f,
                    "{} block(s) of method '{}' cannot be reached from any compact node",
                    remaining, method
                )
            }
            CdgError::MissingEdgeTarget { node, pc } => {
                write!(f, "successor pc {} of node {} starts no compact node", pc, node)
            }
            CdgError::MergeShape {
                node,
                outgoing,
                incoming,
            } => {
                write!(
                    f,
                    "cannot merge past revert at node {}: expected one remaining successor with one predecessor, found {} successor(s) and {} predecessor(s)",
                    node, outgoing, incoming
                )
            }
            CdgError::AmbiguousRoot { candidates } => {
                write!(f, "no unique start node, candidates: [{}]", candidates.join(", "))
            }
            CdgError::UnreachableNode { node } => {
                write!(f, "node {} is unreachable from the start node", node)
            }
            CdgError::MissingTreeEdge { parent, child } => {
                write!(f, "DFS parent {} is missing from the predecessors of child {}", parent, child)
            }
            CdgError::MissingDominator { node } => {
                write!(f, "node {} has no immediate dominator", node)
            }
        }
    }
}

impl std::error::Error for CdgError {}

/// CDG result type
pub type CdgResult<T> = Result<T, CdgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CdgError::MissingEdgeTarget {
            node: "f()#2".to_string(),
            pc: 77,
        };
        assert_eq!(err.to_string(), "successor pc 77 of node f()#2 starts no compact node");

        let err = CdgError::AmbiguousRoot {
            candidates: vec!["a#1".to_string(), "b#1".to_string()],
        };
        assert!(err.to_string().contains("[a#1, b#1]"));
    }
}
