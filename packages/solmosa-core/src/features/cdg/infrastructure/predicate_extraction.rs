//! Locates the comparison that controls a node's conditional jump
//!
//! Forward scan of the final block for LT/GT/SLT/SGT/EQ, then a backward
//! scan for ISZERO. When two booleans are live on the stack at once the
//! first comparison may not be the one feeding JUMPI; that case keeps the
//! first match.

use crate::features::cdg::domain::{NodeIdx, Predicate, PredicateKind};
use crate::features::flow_graph::BasicBlock;
use crate::shared::opcodes::{is_comparison, ISZERO};

pub fn extract_predicate(block: &BasicBlock, owner: NodeIdx) -> Predicate {
    let comparison = block
        .instructions
        .iter()
        .find(|ins| is_comparison(&ins.opcode))
        .or_else(|| block.instructions.iter().rev().find(|ins| ins.opcode == ISZERO));

    match comparison.and_then(|ins| PredicateKind::from_opcode(&ins.opcode).map(|k| (k, ins.pc))) {
        Some((kind, pc)) => Predicate::new(kind, pc, owner),
        None => Predicate::none(block.start_pc, owner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_graph::Instruction;

    fn block(ops: &[(usize, &str)]) -> BasicBlock {
        BasicBlock::new(ops.iter().map(|(pc, op)| Instruction::new(*pc, *op)).collect())
    }

    #[test]
    fn test_comparison_wins_over_iszero() {
        let b = block(&[(31, "JUMPDEST"), (39, "GT"), (40, "ISZERO"), (43, "JUMPI")]);
        let p = extract_predicate(&b, 3);
        assert_eq!(p.kind, PredicateKind::Gt);
        assert_eq!(p.pc, 39);
        assert_eq!(p.owner, 3);
    }

    #[test]
    fn test_last_iszero_when_no_comparison() {
        let b = block(&[(0, "ISZERO"), (1, "CALLVALUE"), (2, "ISZERO"), (3, "JUMPI")]);
        let p = extract_predicate(&b, 0);
        assert_eq!(p.kind, PredicateKind::IsZero);
        assert_eq!(p.pc, 2);
    }

    #[test]
    fn test_none_uses_block_start() {
        let b = block(&[(50, "JUMPDEST"), (51, "PUSH1"), (53, "JUMP")]);
        let p = extract_predicate(&b, 1);
        assert!(p.is_none());
        assert_eq!(p.pc, 50);
    }

    #[test]
    fn test_first_of_two_live_comparisons_is_kept() {
        // `a < b && c == d` compiled into one block: the LT result is not
        // what JUMPI consumes, but the first comparison is still reported.
        let b = block(&[(10, "LT"), (11, "DUP3"), (12, "EQ"), (13, "AND"), (14, "JUMPI")]);
        let p = extract_predicate(&b, 0);
        assert_eq!(p.kind, PredicateKind::Lt);
        assert_eq!(p.pc, 10);
    }
}
