//! Approach-level precomputation
//!
//! One BFS per traversed edge over the CDG's outgoing adjacency gives a
//! whole matrix row; each entry is then capped by the target's depth,
//! itself a BFS over incoming adjacency back to the root.

use crate::features::cdg::ControlDependencyGraph;
use crate::features::distance::domain::ApproachLevelMatrix;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::VecDeque;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl ApproachLevelMatrix {
    /// Precompute all approach levels of `cdg`
    pub fn compute(cdg: &ControlDependencyGraph) -> Self {
        let graph = adjacency(cdg);
        let root: NodeIndex = NodeIndex::new(cdg.root());
        let edges = cdg.edges();

        let max_levels: Vec<usize> = edges
            .iter()
            .map(|edge| {
                bfs_depths(&graph, NodeIndex::new(edge.start), Direction::Incoming)[root.index()]
                    .unwrap_or_else(|| cdg.depth(edge.start))
            })
            .collect();

        let row = |reached: usize| -> Vec<usize> {
            let depths = bfs_depths(&graph, NodeIndex::new(edges[reached].end), Direction::Outgoing);
            edges
                .iter()
                .enumerate()
                .map(|(target, edge)| {
                    if target == reached {
                        max_levels[target]
                    } else {
                        depths[edge.start]
                            .map_or(max_levels[target], |d| d.min(max_levels[target]))
                    }
                })
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<usize>> = (0..edges.len()).into_par_iter().map(row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<usize>> = (0..edges.len()).map(row).collect();

        debug!(edges = edges.len(), "computed approach-level matrix");
        Self::from_rows(rows)
    }
}

fn adjacency(cdg: &ControlDependencyGraph) -> DiGraph<(), ()> {
    let mut graph = DiGraph::with_capacity(cdg.nodes().len(), cdg.edge_count());
    for _ in cdg.nodes() {
        graph.add_node(());
    }
    for edge in cdg.edges() {
        graph.add_edge(NodeIndex::new(edge.start), NodeIndex::new(edge.end), ());
    }
    graph
}

/// Hop count from `from` to every node, `None` where unreachable
fn bfs_depths(graph: &DiGraph<(), ()>, from: NodeIndex, direction: Direction) -> Vec<Option<usize>> {
    let mut depths = vec![None; graph.node_count()];
    let mut queue = VecDeque::new();
    depths[from.index()] = Some(0);
    queue.push_back(from);

    while let Some(node) = queue.pop_front() {
        let depth = depths[node.index()].unwrap_or_default();
        for next in graph.neighbors_directed(node, direction) {
            if depths[next.index()].is_none() {
                depths[next.index()] = Some(depth + 1);
                queue.push_back(next);
            }
        }
    }
    depths
}
