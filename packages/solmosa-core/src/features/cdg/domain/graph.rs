use super::edge::CompactEdge;
use super::node::{CompactNode, NodeId, NodeIdx};
use super::predicate::PredicateKind;
use crate::features::flow_graph::DISPATCHER;
use serde::Serialize;

// ═══════════════════════════════════════════════════════════════════════════
// Compacted CFG (before the dominator pass)
// ═══════════════════════════════════════════════════════════════════════════

/// Arena of compact nodes with raw CFG adjacency
#[derive(Debug, Clone, Default)]
pub struct CompactGraph {
    pub nodes: Vec<CompactNode>,
}

impl CompactGraph {
    pub fn push_node(&mut self, node: CompactNode) -> NodeIdx {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Record `from → to` on both endpoints
    pub fn add_edge(&mut self, from: NodeIdx, to: NodeIdx) {
        self.nodes[from].outgoing.insert(to);
        self.nodes[to].incoming.insert(from);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, id: &NodeId) -> Option<NodeIdx> {
        self.nodes.iter().position(|n| &n.id == id)
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.outgoing.len()).sum()
    }

    /// Nodes without predecessors
    pub fn start_nodes(&self) -> Vec<NodeIdx> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].incoming.is_empty())
            .collect()
    }

    /// Drop nodes flagged in `removed`, compacting the arena and remapping
    /// adjacency. Returns the old → new index map.
    pub(crate) fn retain_nodes(&mut self, removed: &[bool]) -> Vec<Option<NodeIdx>> {
        let mut remap = vec![None; self.nodes.len()];
        let mut next = 0;
        for (old, gone) in removed.iter().enumerate() {
            if !gone {
                remap[old] = Some(next);
                next += 1;
            }
        }

        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = nodes
            .into_iter()
            .enumerate()
            .filter(|(old, _)| !removed[*old])
            .map(|(_, mut node)| {
                node.incoming = node.incoming.iter().filter_map(|&i| remap[i]).collect();
                node.outgoing = node.outgoing.iter().filter_map(|&i| remap[i]).collect();
                node
            })
            .collect();
        remap
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Control-dependency graph (after the dominator pass)
// ═══════════════════════════════════════════════════════════════════════════

/// Final CDG: nodes in DFS preorder, one dominator edge per non-root node
#[derive(Debug, Clone)]
pub struct ControlDependencyGraph {
    nodes: Vec<CompactNode>,
    edges: Vec<CompactEdge>,
    start_nodes: Vec<NodeIdx>,
    root: NodeIdx,
    edges_from: Vec<Vec<usize>>,
    edges_into: Vec<Vec<usize>>,
    /// (first block start, first block end, node) sorted by start pc
    landing: Vec<(usize, usize, NodeIdx)>,
}

impl ControlDependencyGraph {
    pub fn new(
        nodes: Vec<CompactNode>,
        edges: Vec<CompactEdge>,
        start_nodes: Vec<NodeIdx>,
        root: NodeIdx,
    ) -> Self {
        let mut edges_from = vec![Vec::new(); nodes.len()];
        let mut edges_into = vec![Vec::new(); nodes.len()];
        for (i, edge) in edges.iter().enumerate() {
            edges_from[edge.start].push(i);
            edges_into[edge.end].push(i);
        }

        let mut landing: Vec<_> = nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.first_block().map(|b| (b.start_pc, b.end_pc, idx)))
            .collect();
        landing.sort_by_key(|&(start, _, idx)| (start, idx));

        Self {
            nodes,
            edges,
            start_nodes,
            root,
            edges_from,
            edges_into,
            landing,
        }
    }

    pub fn nodes(&self) -> &[CompactNode] {
        &self.nodes
    }

    pub fn node(&self, idx: NodeIdx) -> &CompactNode {
        &self.nodes[idx]
    }

    pub fn edges(&self) -> &[CompactEdge] {
        &self.edges
    }

    pub fn edge(&self, idx: usize) -> &CompactEdge {
        &self.edges[idx]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn start_nodes(&self) -> &[NodeIdx] {
        &self.start_nodes
    }

    /// Dispatcher entry; every call starts here
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    /// Edge indices leaving `node`
    pub fn edges_from(&self, node: NodeIdx) -> &[usize] {
        &self.edges_from[node]
    }

    /// Edge indices entering `node` (at most one in a dominator tree)
    pub fn edges_into(&self, node: NodeIdx) -> &[usize] {
        &self.edges_into[node]
    }

    pub fn find(&self, id: &NodeId) -> Option<NodeIdx> {
        self.nodes.iter().position(|n| &n.id == id)
    }

    /// Node whose first block contains `pc`
    pub fn node_landing_at(&self, pc: usize) -> Option<NodeIdx> {
        let upper = self.landing.partition_point(|&(start, _, _)| start <= pc);
        self.landing[..upper]
            .iter()
            .filter(|&&(_, end, _)| pc <= end)
            .map(|&(_, _, idx)| idx)
            .min()
    }

    /// Depth of `node` below the root in the dominator tree
    pub fn depth(&self, node: NodeIdx) -> usize {
        let mut depth = 0;
        let mut current = node;
        while let Some(parent) = self.nodes[current].immediate_dominator {
            depth += 1;
            current = parent;
        }
        depth
    }

    pub fn summary(&self, contract: &str) -> CdgSummary {
        CdgSummary {
            contract: contract.to_string(),
            root: self.nodes[self.root].id.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeSummary {
                    id: n.id.clone(),
                    start_pc: n.start_pc,
                    end_pc: n.end_pc,
                    blocks: n.blocks.len(),
                    immediate_dominator: n.immediate_dominator.map(|d| self.nodes[d].id.clone()),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| EdgeSummary {
                    start: self.nodes[e.start].id.clone(),
                    end: self.nodes[e.end].id.clone(),
                    predicate: e.predicate.kind,
                    predicate_pc: e.predicate.pc,
                })
                .collect(),
        }
    }

    /// True if the root belongs to the dispatcher
    pub fn rooted_at_dispatcher(&self) -> bool {
        self.nodes[self.root].id.method == DISPATCHER
    }
}

/// Serializable view of a CDG for inspection tools
#[derive(Debug, Clone, Serialize)]
pub struct CdgSummary {
    pub contract: String,
    pub root: NodeId,
    pub nodes: Vec<NodeSummary>,
    pub edges: Vec<EdgeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub start_pc: usize,
    pub end_pc: usize,
    pub blocks: usize,
    pub immediate_dominator: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeSummary {
    pub start: NodeId,
    pub end: NodeId,
    pub predicate: PredicateKind,
    pub predicate_pc: usize,
}
