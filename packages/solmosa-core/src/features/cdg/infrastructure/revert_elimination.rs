//! Elimination of compiler-injected revert nodes
//!
//! A revert-terminated node outside the dispatcher and fallback is cut from
//! its predecessors, and each predecessor then absorbs its single remaining
//! successor. Merges run in reverse creation order so chained guards
//! collapse bottom-up.
//!
//! Payable methods keep a revert node whose guard reads CALLVALUE: that is a
//! user-written `require(msg.value ...)` the generator can steer, not the
//! non-payable guard solc injects.

use super::errors::{CdgError, CdgResult};
use crate::features::cdg::domain::{CompactGraph, NodeIdx};
use crate::shared::opcodes::CALLVALUE;
use std::collections::BTreeSet;
use tracing::debug;

/// Returns the number of revert nodes removed
pub fn eliminate_revert_nodes(
    graph: &mut CompactGraph,
    payable_methods: &BTreeSet<String>,
) -> CdgResult<usize> {
    let count = graph.len();
    let mut removed = vec![false; count];
    let mut merge_queue: Vec<NodeIdx> = Vec::new();

    for r in 0..count {
        let node = &graph.nodes[r];
        if !node.is_revert_terminated() || node.is_entry_method() {
            continue;
        }
        if is_value_guard(graph, r, payable_methods) {
            debug!(node = %graph.nodes[r].id, "keeping msg.value guard of payable method");
            continue;
        }

        let parents: Vec<NodeIdx> = graph.nodes[r].incoming.iter().copied().collect();
        for p in parents {
            graph.nodes[p].outgoing.remove(&r);
            merge_queue.push(p);
        }
        graph.nodes[r].incoming.clear();
        removed[r] = true;
        debug!(node = %graph.nodes[r].id, "removed revert node");
    }

    let eliminated = removed.iter().filter(|&&gone| gone).count();

    // A node absorbed by an earlier merge is represented by its absorber
    let mut absorbed_into: Vec<Option<NodeIdx>> = vec![None; count];
    for &queued in merge_queue.iter().rev() {
        let p = representative(&absorbed_into, queued);
        let shape_error = |graph: &CompactGraph, outgoing: usize, incoming: usize| CdgError::MergeShape {
            node: graph.nodes[p].id.to_string(),
            outgoing,
            incoming,
        };

        let outgoing = graph.nodes[p].outgoing.len();
        let successor = match graph.nodes[p].outgoing.iter().next() {
            Some(&s) if outgoing == 1 => s,
            _ => return Err(shape_error(graph, outgoing, 0)),
        };
        let incoming = graph.nodes[successor].incoming.len();
        if incoming != 1 || successor == p {
            return Err(shape_error(graph, outgoing, incoming));
        }

        let absorbed = graph.nodes[successor].clone();
        graph.nodes[successor].incoming.clear();
        graph.nodes[successor].outgoing.clear();
        for &child in &absorbed.outgoing {
            let child_node = &mut graph.nodes[child];
            child_node.incoming.remove(&successor);
            child_node.incoming.insert(p);
        }
        graph.nodes[p].absorb(absorbed);

        removed[successor] = true;
        absorbed_into[successor] = Some(p);
    }

    graph.retain_nodes(&removed);
    Ok(eliminated)
}

fn representative(absorbed_into: &[Option<NodeIdx>], mut idx: NodeIdx) -> NodeIdx {
    while let Some(next) = absorbed_into[idx] {
        idx = next;
    }
    idx
}

fn is_value_guard(graph: &CompactGraph, r: NodeIdx, payable_methods: &BTreeSet<String>) -> bool {
    let node = &graph.nodes[r];
    if !payable_methods.contains(node.method()) || node.incoming.len() != 1 {
        return false;
    }
    node.incoming
        .iter()
        .filter_map(|&p| graph.nodes[p].last_block())
        .any(|block| block.contains_opcode(CALLVALUE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cdg::domain::NodeId;
    use crate::features::cdg::infrastructure::compact_methods;
    use crate::features::flow_graph::{BasicBlock, ControlFlowGraph, Instruction, MethodCfg};

    fn block(ops: &[(usize, &str)], succ: &[usize], pred: &[usize]) -> BasicBlock {
        BasicBlock::new(ops.iter().map(|(pc, op)| Instruction::new(*pc, *op)).collect())
            .with_successors(succ.to_vec())
            .with_predecessors(pred.to_vec())
    }

    /// Non-payable guard, then `x > 5` branching to two STOP blocks
    fn guarded_method(name: &str) -> MethodCfg {
        MethodCfg::new(
            name,
            vec![
                block(&[(20, "JUMPDEST"), (21, "CALLVALUE"), (23, "ISZERO"), (26, "JUMPI")], &[27, 31], &[]),
                block(&[(27, "PUSH1"), (29, "DUP1"), (30, "REVERT")], &[], &[20]),
                block(&[(31, "JUMPDEST"), (39, "GT"), (43, "JUMPI")], &[44, 48], &[20]),
                block(&[(44, "PUSH1"), (47, "STOP")], &[], &[31]),
                block(&[(48, "JUMPDEST"), (52, "STOP")], &[], &[31]),
            ],
        )
    }

    #[test]
    fn test_guard_revert_collapses_into_predecessor() {
        let cfg = ControlFlowGraph::new(vec![guarded_method("check(uint256)")]);
        let mut graph = compact_methods(&cfg).unwrap();
        assert_eq!(graph.len(), 5);

        let eliminated = eliminate_revert_nodes(&mut graph, &BTreeSet::new()).unwrap();
        assert_eq!(eliminated, 1);
        assert_eq!(graph.len(), 3);

        let entry = graph.find(&NodeId::new("check(uint256)", 1)).unwrap();
        let node = &graph.nodes[entry];
        assert_eq!((node.start_pc, node.end_pc), (20, 43));
        assert_eq!(node.blocks.len(), 2);
        assert_eq!(node.outgoing.len(), 2);
        for &child in &node.outgoing {
            assert_eq!(graph.nodes[child].incoming.iter().copied().collect::<Vec<_>>(), vec![entry]);
        }
    }

    #[test]
    fn test_payable_value_guard_is_kept() {
        let cfg = ControlFlowGraph::new(vec![guarded_method("deposit(uint256)")]);
        let mut graph = compact_methods(&cfg).unwrap();
        let payable: BTreeSet<String> = ["deposit(uint256)".to_string()].into_iter().collect();

        let eliminated = eliminate_revert_nodes(&mut graph, &payable).unwrap();
        assert_eq!(eliminated, 0);
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_dispatcher_reverts_are_untouched() {
        let dispatcher = MethodCfg::new(
            "_dispatcher",
            vec![
                block(&[(0, "EQ"), (1, "JUMPI")], &[2, 5], &[]),
                block(&[(2, "PUSH1"), (4, "REVERT")], &[], &[0]),
                block(&[(5, "JUMPDEST"), (6, "STOP")], &[], &[0]),
            ],
        );
        let mut graph = compact_methods(&ControlFlowGraph::new(vec![dispatcher])).unwrap();
        assert_eq!(eliminate_revert_nodes(&mut graph, &BTreeSet::new()).unwrap(), 0);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_chained_guards_collapse() {
        // Two consecutive require() guards before the body
        let method = MethodCfg::new(
            "f(uint256)",
            vec![
                block(&[(0, "CALLVALUE"), (1, "JUMPI")], &[2, 5], &[]),
                block(&[(2, "PUSH1"), (4, "REVERT")], &[], &[0]),
                block(&[(5, "JUMPDEST"), (6, "LT"), (7, "JUMPI")], &[8, 11], &[0]),
                block(&[(8, "PUSH1"), (10, "REVERT")], &[], &[5]),
                block(&[(11, "JUMPDEST"), (12, "STOP")], &[], &[5]),
            ],
        );
        let mut graph = compact_methods(&ControlFlowGraph::new(vec![method])).unwrap();

        assert_eq!(eliminate_revert_nodes(&mut graph, &BTreeSet::new()).unwrap(), 2);
        assert_eq!(graph.len(), 1);
        let node = &graph.nodes[0];
        assert_eq!((node.start_pc, node.end_pc), (0, 12));
        assert_eq!(node.blocks.len(), 3);
        assert!(node.outgoing.is_empty());
    }

    #[test]
    fn test_two_revert_children_is_fatal() {
        let method = MethodCfg::new(
            "f()",
            vec![
                block(&[(0, "ISZERO"), (1, "JUMPI")], &[2, 5], &[]),
                block(&[(2, "PUSH1"), (4, "REVERT")], &[], &[0]),
                block(&[(5, "JUMPDEST"), (6, "REVERT")], &[], &[0]),
            ],
        );
        let mut graph = compact_methods(&ControlFlowGraph::new(vec![method])).unwrap();
        let err = eliminate_revert_nodes(&mut graph, &BTreeSet::new()).unwrap_err();
        assert!(matches!(err, CdgError::MergeShape { outgoing: 0, .. }));
    }
}
