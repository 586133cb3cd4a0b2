//! CFG and artifact fixtures
//!
//! `check(uint256)` is a non-payable method branching on `x > 5`:
//!
//! ```text
//! _dispatcher#1 (0..8)  --EQ@5-->  _fallback#1 (9)
//!                       --EQ@5-->  check#1 (20..26 + 31..43, guard revert at 27..30 eliminated)
//! check#1               --GT@39--> check#4 (44..47, x > 5)
//!                       --GT@39--> check#5 (48..52, x <= 5)
//! ```

use serde_json::{json, Value};
use solmosa_core::{BasicBlock, ControlFlowGraph, Instruction, MethodCfg};

pub const CHECK: &str = "check(uint256)";

/// Edge indices of the fixture CDG
pub const EDGE_TO_FALLBACK: usize = 0;
pub const EDGE_TO_CHECK: usize = 1;
pub const EDGE_X_ABOVE_FIVE: usize = 2;
pub const EDGE_X_AT_MOST_FIVE: usize = 3;

pub const DISPATCHER_PCS: &[usize] = &[0, 2, 3, 5, 6, 8];
pub const GUARD_PCS: &[usize] = &[20, 21, 22, 23, 24, 26];
pub const REVERT_PCS: &[usize] = &[27, 29, 30];
pub const CONDITION_PCS: &[usize] = &[31, 32, 33, 35, 36, 38, 39, 40, 41, 43];
pub const ABOVE_PCS: &[usize] = &[44, 46, 47];
pub const AT_MOST_PCS: &[usize] = &[48, 49, 51, 52];
pub const GT_PC: usize = 39;
pub const EQ_PC: usize = 5;

pub fn block(ops: &[(usize, &str)], successors: &[usize], predecessors: &[usize]) -> BasicBlock {
    BasicBlock::new(ops.iter().map(|(pc, op)| Instruction::new(*pc, *op)).collect())
        .with_successors(successors.to_vec())
        .with_predecessors(predecessors.to_vec())
}

fn dispatcher(successors: &[usize]) -> MethodCfg {
    MethodCfg::new(
        "_dispatcher",
        vec![block(
            &[
                (0, "PUSH1"),
                (2, "CALLDATALOAD"),
                (3, "PUSH1"),
                (5, "EQ"),
                (6, "PUSH1"),
                (8, "JUMPI"),
            ],
            successors,
            &[],
        )],
    )
}

fn fallback() -> MethodCfg {
    MethodCfg::new("_fallback", vec![block(&[(9, "STOP")], &[], &[0])])
}

fn check() -> MethodCfg {
    MethodCfg::new(
        CHECK,
        vec![
            block(
                &[
                    (20, "JUMPDEST"),
                    (21, "CALLVALUE"),
                    (22, "DUP1"),
                    (23, "ISZERO"),
                    (24, "PUSH1"),
                    (26, "JUMPI"),
                ],
                &[27, 31],
                &[0],
            ),
            block(&[(27, "PUSH1"), (29, "DUP1"), (30, "REVERT")], &[], &[20]),
            block(
                &[
                    (31, "JUMPDEST"),
                    (32, "POP"),
                    (33, "PUSH1"),
                    (35, "CALLDATALOAD"),
                    (36, "PUSH1"),
                    (38, "DUP2"),
                    (39, "GT"),
                    (40, "ISZERO"),
                    (41, "PUSH1"),
                    (43, "JUMPI"),
                ],
                &[44, 48],
                &[20],
            ),
            block(&[(44, "PUSH1"), (46, "POP"), (47, "STOP")], &[], &[31]),
            block(&[(48, "JUMPDEST"), (49, "PUSH1"), (51, "POP"), (52, "STOP")], &[], &[31]),
        ],
    )
}

/// Dispatcher, fallback and `check(uint256)`
pub fn threshold_cfg() -> ControlFlowGraph {
    ControlFlowGraph::new(vec![dispatcher(&[9, 20]), fallback(), check()])
}

/// Dispatcher that can only fall through to the fallback
pub fn fallback_only_cfg() -> ControlFlowGraph {
    ControlFlowGraph::new(vec![dispatcher(&[9]), fallback()])
}

pub fn threshold_artifact() -> Value {
    json!({
        "contractName": "Threshold",
        "abi": [
            {"type": "constructor", "inputs": [], "stateMutability": "nonpayable"},
            {
                "type": "function",
                "name": "check",
                "inputs": [{"name": "x", "type": "uint256"}],
                "outputs": [],
                "stateMutability": "nonpayable"
            }
        ]
    })
}

pub fn empty_artifact() -> Value {
    json!({
        "contractName": "Empty",
        "abi": []
    })
}

pub const THRESHOLD_SOURCE: &str = r#"
pragma solidity ^0.5.0;

contract Threshold {
    uint256 public hits;

    function check(uint256 x) public {
        if (x > 5) {
            hits += 1;
        } else {
            hits = 3;
        }
    }
}
"#;
