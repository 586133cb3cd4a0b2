//! Lengauer–Tarjan dominators over compact nodes
//!
//! All scratch state (preorder numbers, semidominators, buckets, the
//! path-compressed forest) lives in [`LengauerTarjan`] and is dropped when
//! the computation returns. Internally vertices are addressed by preorder
//! number; arena indices only appear at the boundary.

use super::errors::{CdgError, CdgResult};
use super::predicate_extraction::extract_predicate;
use crate::features::cdg::domain::{
    CompactEdge, CompactGraph, CompactNode, ControlDependencyGraph, NodeIdx, Predicate,
};
use crate::features::flow_graph::DISPATCHER;
use std::collections::BTreeSet;
use tracing::debug;

/// Immediate dominators of every node reachable from the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominatorTree {
    pub root: NodeIdx,
    /// Arena indices in DFS preorder
    pub preorder: Vec<NodeIdx>,
    /// Immediate dominator per arena index (`None` for the root)
    pub idom: Vec<Option<NodeIdx>>,
}

impl DominatorTree {
    /// True if `a` dominates `b` (reflexive)
    pub fn dominates(&self, a: NodeIdx, b: NodeIdx) -> bool {
        let mut current = Some(b);
        while let Some(node) = current {
            if node == a {
                return true;
            }
            current = self.idom[node];
        }
        false
    }
}

/// Single-use dominator computation
pub struct LengauerTarjan<'g> {
    graph: &'g CompactGraph,
    root: NodeIdx,
    /// preorder number -> arena index
    vertex: Vec<NodeIdx>,
    /// arena index -> preorder number
    dfnum: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    semi: Vec<usize>,
    ancestor: Vec<Option<usize>>,
    label: Vec<usize>,
    bucket: Vec<Vec<usize>>,
    dom: Vec<Option<usize>>,
}

impl<'g> LengauerTarjan<'g> {
    pub fn new(graph: &'g CompactGraph, root: NodeIdx) -> Self {
        Self {
            graph,
            root,
            vertex: Vec::with_capacity(graph.len()),
            dfnum: vec![None; graph.len()],
            parent: Vec::new(),
            semi: Vec::new(),
            ancestor: Vec::new(),
            label: Vec::new(),
            bucket: Vec::new(),
            dom: Vec::new(),
        }
    }

    pub fn compute(mut self) -> CdgResult<DominatorTree> {
        self.depth_first_numbering()?;

        if let Some(unreached) = (0..self.graph.len()).find(|&i| self.dfnum[i].is_none()) {
            return Err(CdgError::UnreachableNode {
                node: self.graph.nodes[unreached].id.to_string(),
            });
        }

        let n = self.vertex.len();
        for w in (1..n).rev() {
            let p = self.parent[w].ok_or_else(|| self.missing_dominator(w))?;

            let preds: Vec<usize> = self.graph.nodes[self.vertex[w]]
                .incoming
                .iter()
                .filter_map(|&v| self.dfnum[v])
                .collect();
            for v in preds {
                let u = self.eval(v);
                if self.semi[u] < self.semi[w] {
                    self.semi[w] = self.semi[u];
                }
            }

            let s = self.semi[w];
            self.bucket[s].push(w);
            self.ancestor[w] = Some(p);

            for v in std::mem::take(&mut self.bucket[p]) {
                let u = self.eval(v);
                self.dom[v] = Some(if self.semi[u] < self.semi[v] { u } else { p });
            }
        }

        for w in 1..n {
            let d = self.dom[w].ok_or_else(|| self.missing_dominator(w))?;
            if d != self.semi[w] {
                self.dom[w] = self.dom[d];
            }
        }

        let mut idom = vec![None; self.graph.len()];
        for w in 1..n {
            let d = self.dom[w].ok_or_else(|| self.missing_dominator(w))?;
            idom[self.vertex[w]] = Some(self.vertex[d]);
        }

        Ok(DominatorTree {
            root: self.root,
            preorder: self.vertex,
            idom,
        })
    }

    /// Iterative DFS following outgoing adjacency in ascending index order
    fn depth_first_numbering(&mut self) -> CdgResult<()> {
        let successors: Vec<Vec<NodeIdx>> = self
            .graph
            .nodes
            .iter()
            .map(|n| n.outgoing.iter().copied().collect())
            .collect();

        self.number(self.root, None);
        let mut stack: Vec<(NodeIdx, usize)> = vec![(self.root, 0)];

        while let Some(top) = stack.len().checked_sub(1) {
            let (v, pos) = stack[top];
            if pos >= successors[v].len() {
                stack.pop();
                continue;
            }
            stack[top].1 += 1;

            let w = successors[v][pos];
            if self.dfnum[w].is_none() {
                // The semidominator pass walks `incoming`; both sides must agree
                if !self.graph.nodes[w].incoming.contains(&v) {
                    return Err(CdgError::MissingTreeEdge {
                        parent: self.graph.nodes[v].id.to_string(),
                        child: self.graph.nodes[w].id.to_string(),
                    });
                }
                self.number(w, self.dfnum[v]);
                stack.push((w, 0));
            }
        }
        Ok(())
    }

    fn number(&mut self, node: NodeIdx, parent: Option<usize>) {
        let num = self.vertex.len();
        self.dfnum[node] = Some(num);
        self.vertex.push(node);
        self.parent.push(parent);
        self.semi.push(num);
        self.ancestor.push(None);
        self.label.push(num);
        self.bucket.push(Vec::new());
        self.dom.push(None);
    }

    /// Vertex with minimal semidominator on the compressed path above `v`
    fn eval(&mut self, v: usize) -> usize {
        if self.ancestor[v].is_none() {
            return v;
        }
        self.compress(v);
        self.label[v]
    }

    fn compress(&mut self, v: usize) {
        // Collect the path up to the child of the forest root, then fold it
        // top-down.
        let mut path = Vec::new();
        let mut x = v;
        while let Some(a) = self.ancestor[x] {
            if self.ancestor[a].is_none() {
                break;
            }
            path.push(x);
            x = a;
        }

        for &x in path.iter().rev() {
            if let Some(a) = self.ancestor[x] {
                if self.semi[self.label[a]] < self.semi[self.label[x]] {
                    self.label[x] = self.label[a];
                }
                self.ancestor[x] = self.ancestor[a];
            }
        }
    }

    fn missing_dominator(&self, w: usize) -> CdgError {
        CdgError::MissingDominator {
            node: self.graph.nodes[self.vertex[w]].id.to_string(),
        }
    }
}

/// Rewrites a compacted graph into the final CDG
pub struct DominatorAnalyzer;

impl DominatorAnalyzer {
    /// Unique start node: the dispatcher entry if present, otherwise the
    /// only node without predecessors.
    pub fn select_root(graph: &CompactGraph) -> CdgResult<NodeIdx> {
        if graph.is_empty() {
            return Err(CdgError::EmptyGraph);
        }
        if let Some(idx) = graph
            .nodes
            .iter()
            .position(|n| n.id.method == DISPATCHER && n.id.index == 1)
        {
            return Ok(idx);
        }
        match graph.start_nodes().as_slice() {
            [single] => Ok(*single),
            candidates => Err(CdgError::AmbiguousRoot {
                candidates: candidates
                    .iter()
                    .map(|&i| graph.nodes[i].id.to_string())
                    .collect(),
            }),
        }
    }

    /// Replace raw CFG adjacency with the dominator tree and derive one
    /// edge per non-root node, labelled with its dominator's predicate
    pub fn rewrite(graph: CompactGraph) -> CdgResult<ControlDependencyGraph> {
        let root = Self::select_root(&graph)?;
        let start_nodes = graph.start_nodes();
        let tree = LengauerTarjan::new(&graph, root).compute()?;

        let mut new_index = vec![0; graph.len()];
        for (order, &old) in tree.preorder.iter().enumerate() {
            new_index[old] = order;
        }

        let mut slots: Vec<Option<CompactNode>> = graph.nodes.into_iter().map(Some).collect();
        let mut nodes: Vec<CompactNode> = Vec::with_capacity(slots.len());
        for (order, &old) in tree.preorder.iter().enumerate() {
            let Some(mut node) = slots[old].take() else {
                continue;
            };
            node.incoming = BTreeSet::new();
            node.outgoing = BTreeSet::new();
            node.immediate_dominator = tree.idom[old].map(|d| new_index[d]);
            node.predicate = node.last_block().map(|b| extract_predicate(b, order));
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
        for w in 0..nodes.len() {
            let Some(d) = nodes[w].immediate_dominator else {
                continue;
            };
            nodes[w].incoming.insert(d);
            nodes[d].outgoing.insert(w);
            let predicate = nodes[d]
                .predicate
                .clone()
                .unwrap_or_else(|| Predicate::none(nodes[d].start_pc, d));
            edges.push(CompactEdge::new(d, w, predicate));
        }

        let start_nodes = start_nodes.into_iter().map(|i| new_index[i]).collect();
        let root = new_index[root];

        debug!(nodes = nodes.len(), edges = edges.len(), "built dominator edges");
        Ok(ControlDependencyGraph::new(nodes, edges, start_nodes, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cdg::domain::{NodeId, PredicateKind};
    use crate::features::flow_graph::{BasicBlock, Instruction};

    fn graph_from_edges(count: usize, edges: &[(usize, usize)]) -> CompactGraph {
        let mut graph = CompactGraph::default();
        for i in 0..count {
            let block = BasicBlock::new(vec![
                Instruction::new(i * 10, "JUMPDEST"),
                Instruction::new(i * 10 + 1, "LT"),
                Instruction::new(i * 10 + 2, "JUMPI"),
            ]);
            graph.push_node(CompactNode::new(NodeId::new("m", i + 1), vec![block], vec![]));
        }
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    #[test]
    fn test_diamond() {
        let graph = graph_from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let tree = LengauerTarjan::new(&graph, 0).compute().unwrap();
        assert_eq!(tree.idom, vec![None, Some(0), Some(0), Some(0)]);
        assert!(tree.dominates(0, 3));
        assert!(!tree.dominates(1, 3));
    }

    #[test]
    fn test_loop_with_two_entries_into_header_body() {
        // Classic example needing the second (fix-up) pass:
        // 0 -> 1, 1 -> 2, 2 -> 3, 3 -> 1, 0 -> 4, 4 -> 3
        let graph = graph_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 1), (0, 4), (4, 3)]);
        let tree = LengauerTarjan::new(&graph, 0).compute().unwrap();
        assert_eq!(tree.idom[1], Some(0));
        assert_eq!(tree.idom[2], Some(1));
        assert_eq!(tree.idom[3], Some(0));
        assert_eq!(tree.idom[4], Some(0));
    }

    #[test]
    fn test_unreachable_node_is_fatal() {
        let graph = graph_from_edges(3, &[(0, 1)]);
        let err = LengauerTarjan::new(&graph, 0).compute().unwrap_err();
        assert_eq!(
            err,
            CdgError::UnreachableNode {
                node: "m#3".to_string()
            }
        );
    }

    #[test]
    fn test_tree_edge_missing_from_predecessors_is_fatal() {
        let mut graph = graph_from_edges(3, &[(0, 1)]);
        // 0 -> 2 recorded on the parent only
        graph.nodes[0].outgoing.insert(2);

        let err = LengauerTarjan::new(&graph, 0).compute().unwrap_err();
        assert_eq!(
            err,
            CdgError::MissingTreeEdge {
                parent: "m#1".to_string(),
                child: "m#3".to_string()
            }
        );
    }

    #[test]
    fn test_rewrite_builds_dominator_edges() {
        let graph = graph_from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let cdg = DominatorAnalyzer::rewrite(graph).unwrap();

        assert_eq!(cdg.root(), 0);
        assert_eq!(cdg.edge_count(), 3);
        for edge in cdg.edges() {
            assert_eq!(edge.start, 0);
            assert_eq!(edge.predicate.kind, PredicateKind::Lt);
            assert_eq!(edge.predicate.owner, 0);
            assert_eq!(cdg.node(edge.end).immediate_dominator, Some(0));
        }
        assert_eq!(cdg.node(0).outgoing.len(), 3);
        assert_eq!(cdg.start_nodes(), &[0]);
    }

    #[test]
    fn test_ambiguous_root() {
        let graph = graph_from_edges(3, &[(0, 2), (1, 2)]);
        assert!(matches!(
            DominatorAnalyzer::select_root(&graph),
            Err(CdgError::AmbiguousRoot { .. })
        ));
    }
}
