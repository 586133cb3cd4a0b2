//! Control-flow graph supplied by the CFG recovery collaborator
//!
//! The core never disassembles bytecode itself. It consumes per-method
//! basic blocks with instruction-level pcs and successor/predecessor pcs
//! keyed by method.

pub mod domain;
pub mod ports;

pub use domain::{BasicBlock, ControlFlowGraph, Instruction, MethodCfg, DISPATCHER, FALLBACK};
pub use ports::{CfgSource, JsonCfgSource};
