//! CFG domain model

use crate::shared::opcodes;
use serde::{Deserialize, Serialize};

/// Method name the CFG tool assigns to the selector dispatcher
pub const DISPATCHER: &str = "_dispatcher";

/// Method name the CFG tool assigns to the fallback function
pub const FALLBACK: &str = "_fallback";

/// One decoded instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub pc: usize,
    pub opcode: String,
}

impl Instruction {
    pub fn new(pc: usize, opcode: impl Into<String>) -> Self {
        Self {
            pc,
            opcode: opcode.into(),
        }
    }
}

/// Basic block as seen from one method
///
/// `successors` and `predecessors` hold block start pcs. They are keyed by
/// the owning method, so a block shared between methods may report
/// different neighbours in each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub start_pc: usize,
    pub end_pc: usize,
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub successors: Vec<usize>,
    #[serde(default)]
    pub predecessors: Vec<usize>,
}

impl BasicBlock {
    /// Build a block from its instructions; pcs are taken from the first and
    /// last instruction.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let start_pc = instructions.first().map(|i| i.pc).unwrap_or_default();
        let end_pc = instructions.last().map(|i| i.pc).unwrap_or(start_pc);
        Self {
            start_pc,
            end_pc,
            instructions,
            successors: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    pub fn with_successors(mut self, successors: Vec<usize>) -> Self {
        self.successors = successors;
        self
    }

    pub fn with_predecessors(mut self, predecessors: Vec<usize>) -> Self {
        self.predecessors = predecessors;
        self
    }

    pub fn contains_pc(&self, pc: usize) -> bool {
        self.start_pc <= pc && pc <= self.end_pc
    }

    pub fn last_opcode(&self) -> Option<&str> {
        self.instructions.last().map(|i| i.opcode.as_str())
    }

    /// True if the block ends the call frame
    pub fn is_terminal(&self) -> bool {
        self.last_opcode().map(opcodes::is_terminal).unwrap_or(false)
    }

    pub fn contains_opcode(&self, opcode: &str) -> bool {
        self.instructions.iter().any(|i| i.opcode == opcode)
    }
}

/// Blocks of one method in the order the CFG tool listed them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCfg {
    pub name: String,
    pub blocks: Vec<BasicBlock>,
}

impl MethodCfg {
    pub fn new(name: impl Into<String>, blocks: Vec<BasicBlock>) -> Self {
        Self {
            name: name.into(),
            blocks,
        }
    }

    pub fn block_at(&self, start_pc: usize) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.start_pc == start_pc)
    }
}

/// Whole-contract CFG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ControlFlowGraph {
    pub methods: Vec<MethodCfg>,
}

impl ControlFlowGraph {
    pub fn new(methods: Vec<MethodCfg>) -> Self {
        Self { methods }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn method(&self, name: &str) -> Option<&MethodCfg> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn block_count(&self) -> usize {
        self.methods.iter().map(|m| m.blocks.len()).sum()
    }
}
