//! Compaction of basic blocks into compact nodes
//!
//! Per method, blocks are seeded in listing order and extended along
//! single-successor/single-predecessor chains. Inter-node edges are resolved
//! afterwards from the recorded successor pcs.

use super::errors::{CdgError, CdgResult};
use crate::features::cdg::domain::{CompactGraph, CompactNode, NodeId, NodeIdx};
use crate::features::flow_graph::{BasicBlock, ControlFlowGraph, MethodCfg};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Compact every method of `cfg` and connect the resulting nodes
pub fn compact_methods(cfg: &ControlFlowGraph) -> CdgResult<CompactGraph> {
    if cfg.block_count() == 0 {
        return Err(CdgError::EmptyGraph);
    }

    let mut graph = CompactGraph::default();
    for method in &cfg.methods {
        compact_method(method, &mut graph)?;
    }
    resolve_edges(&mut graph)?;

    debug!(
        blocks = cfg.block_count(),
        nodes = graph.len(),
        edges = graph.edge_count(),
        "compacted control-flow graph"
    );
    Ok(graph)
}

fn compact_method(method: &MethodCfg, graph: &mut CompactGraph) -> CdgResult<()> {
    let members: FxHashSet<usize> = method.blocks.iter().map(|b| b.start_pc).collect();
    let in_method_preds = |block: &BasicBlock| -> Vec<usize> {
        block
            .predecessors
            .iter()
            .copied()
            .filter(|pc| members.contains(pc))
            .collect()
    };

    let mut assigned: FxHashSet<usize> = FxHashSet::default();
    let mut sequence = 0;

    while assigned.len() < members.len() {
        let seed = find_seed(method, &assigned, &in_method_preds).ok_or_else(|| {
            CdgError::UnassignedBlocks {
                method: method.name.clone(),
                remaining: members.len() - assigned.len(),
            }
        })?;

        assigned.insert(seed.start_pc);
        let mut blocks = vec![seed.clone()];
        let mut current = seed;

        // Chain extension: stop at 0 or >= 2 successors, at a successor
        // outside the method, or at a successor with several predecessors.
        loop {
            let [next_pc] = current.successors.as_slice() else {
                break;
            };
            let Some(next) = method.block_at(*next_pc) else {
                break;
            };
            if in_method_preds(next).len() != 1 || assigned.contains(&next.start_pc) {
                break;
            }
            assigned.insert(next.start_pc);
            blocks.push(next.clone());
            current = next;
        }

        sequence += 1;
        let successors = current.successors.clone();
        graph.push_node(CompactNode::new(
            NodeId::new(method.name.clone(), sequence),
            blocks,
            successors,
        ));
    }
    Ok(())
}

/// Next seed block: the first unassigned block whose predecessors are all
/// assigned, else (loop headers) the first one with at least one assigned
/// predecessor.
fn find_seed<'m>(
    method: &'m MethodCfg,
    assigned: &FxHashSet<usize>,
    in_method_preds: &impl Fn(&BasicBlock) -> Vec<usize>,
) -> Option<&'m BasicBlock> {
    let unassigned = || method.blocks.iter().filter(|b| !assigned.contains(&b.start_pc));

    unassigned()
        .find(|b| in_method_preds(b).iter().all(|pc| assigned.contains(pc)))
        .or_else(|| unassigned().find(|b| in_method_preds(b).iter().any(|pc| assigned.contains(pc))))
}

fn resolve_edges(graph: &mut CompactGraph) -> CdgResult<()> {
    let mut by_start: FxHashMap<usize, Vec<NodeIdx>> = FxHashMap::default();
    for (idx, node) in graph.nodes.iter().enumerate() {
        by_start.entry(node.start_pc).or_default().push(idx);
    }

    let mut pending = Vec::new();
    for (idx, node) in graph.nodes.iter().enumerate() {
        for &pc in &node.successor_pcs {
            let candidates = by_start.get(&pc).map(Vec::as_slice).unwrap_or(&[]);
            // Shared blocks start several nodes; prefer the one of the same method
            let target = candidates
                .iter()
                .copied()
                .find(|&c| graph.nodes[c].id.method == node.id.method)
                .or_else(|| candidates.first().copied())
                .ok_or_else(|| CdgError::MissingEdgeTarget {
                    node: node.id.to_string(),
                    pc,
                })?;
            pending.push((idx, target));
        }
    }

    for (from, to) in pending {
        graph.add_edge(from, to);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_graph::Instruction;

    fn block(ops: &[(usize, &str)], succ: &[usize], pred: &[usize]) -> BasicBlock {
        BasicBlock::new(ops.iter().map(|(pc, op)| Instruction::new(*pc, *op)).collect())
            .with_successors(succ.to_vec())
            .with_predecessors(pred.to_vec())
    }

    #[test]
    fn test_straight_line_chain_becomes_one_node() {
        let method = MethodCfg::new(
            "f()",
            vec![
                block(&[(0, "PUSH1"), (2, "JUMP")], &[5], &[]),
                block(&[(5, "JUMPDEST"), (6, "JUMP")], &[9], &[0]),
                block(&[(9, "JUMPDEST"), (10, "STOP")], &[], &[5]),
            ],
        );
        let graph = compact_methods(&ControlFlowGraph::new(vec![method])).unwrap();

        assert_eq!(graph.len(), 1);
        let node = &graph.nodes[0];
        assert_eq!(node.id, NodeId::new("f()", 1));
        assert_eq!((node.start_pc, node.end_pc), (0, 10));
        assert_eq!(node.blocks.len(), 3);
    }

    #[test]
    fn test_diamond_splits_at_branch_and_join() {
        let method = MethodCfg::new(
            "f()",
            vec![
                block(&[(0, "ISZERO"), (1, "JUMPI")], &[2, 4], &[]),
                block(&[(2, "PUSH1"), (3, "JUMP")], &[6], &[0]),
                block(&[(4, "JUMPDEST"), (5, "JUMP")], &[6], &[0]),
                block(&[(6, "JUMPDEST"), (7, "STOP")], &[], &[2, 4]),
            ],
        );
        let graph = compact_methods(&ControlFlowGraph::new(vec![method])).unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.edge_count(), 4);
        let join = graph.find(&NodeId::new("f()", 4)).unwrap();
        assert_eq!(graph.nodes[join].start_pc, 6);
        assert_eq!(graph.nodes[join].incoming.len(), 2);
        // Edges are symmetric
        for (i, node) in graph.nodes.iter().enumerate() {
            for &o in &node.outgoing {
                assert!(graph.nodes[o].incoming.contains(&i));
            }
        }
    }

    #[test]
    fn test_loop_header_is_seeded() {
        // 0 -> 2 <-> 5, 2 -> 8
        let method = MethodCfg::new(
            "loop()",
            vec![
                block(&[(0, "PUSH1"), (1, "JUMP")], &[2], &[]),
                block(&[(2, "JUMPDEST"), (3, "LT"), (4, "JUMPI")], &[5, 8], &[0, 5]),
                block(&[(5, "JUMPDEST"), (7, "JUMP")], &[2], &[2]),
                block(&[(8, "JUMPDEST"), (9, "STOP")], &[], &[2]),
            ],
        );
        let graph = compact_methods(&ControlFlowGraph::new(vec![method])).unwrap();

        assert_eq!(graph.len(), 4);
        let header = graph.find(&NodeId::new("loop()", 2)).unwrap();
        assert_eq!(graph.nodes[header].start_pc, 2);
        assert_eq!(graph.nodes[header].incoming.len(), 2);
    }

    #[test]
    fn test_cross_method_successor_prefers_own_method() {
        let dispatcher = MethodCfg::new(
            "_dispatcher",
            vec![block(&[(0, "EQ"), (1, "JUMPI")], &[10], &[])],
        );
        let method = MethodCfg::new("g()", vec![block(&[(10, "JUMPDEST"), (11, "STOP")], &[], &[])]);
        let graph = compact_methods(&ControlFlowGraph::new(vec![dispatcher, method])).unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.nodes[0].outgoing.contains(&1));
        assert!(graph.nodes[1].incoming.contains(&0));
    }

    #[test]
    fn test_missing_successor_is_fatal() {
        let method = MethodCfg::new("f()", vec![block(&[(0, "JUMP")], &[99], &[])]);
        let err = compact_methods(&ControlFlowGraph::new(vec![method])).unwrap_err();
        assert_eq!(
            err,
            CdgError::MissingEdgeTarget {
                node: "f()#1".to_string(),
                pc: 99
            }
        );
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(
            compact_methods(&ControlFlowGraph::default()).unwrap_err(),
            CdgError::EmptyGraph
        );
    }
}
