use super::predicate::Predicate;
use crate::features::flow_graph::{BasicBlock, DISPATCHER, FALLBACK};
use crate::shared::opcodes::{self, REVERT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Arena index of a compact node inside its graph
pub type NodeIdx = usize;

/// Stable identity of a compact node: owning method plus a 1-based
/// creation counter within that method
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub method: String,
    pub index: usize,
}

impl NodeId {
    pub fn new(method: impl Into<String>, index: usize) -> Self {
        Self {
            method: method.into(),
            index,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.method, self.index)
    }
}

/// Maximal straight-line run of basic blocks
///
/// `incoming`/`outgoing` are arena indices into the owning graph. Before the
/// dominator pass they mirror the CFG; afterwards they hold the dominator
/// tree (parent in `incoming`, children in `outgoing`).
#[derive(Debug, Clone, PartialEq)]
pub struct CompactNode {
    pub id: NodeId,
    pub start_pc: usize,
    pub end_pc: usize,
    pub blocks: Vec<BasicBlock>,
    pub incoming: BTreeSet<NodeIdx>,
    pub outgoing: BTreeSet<NodeIdx>,
    pub predicate: Option<Predicate>,
    pub immediate_dominator: Option<NodeIdx>,
    /// Start pcs of the CFG successors of the last block
    pub(crate) successor_pcs: Vec<usize>,
}

impl CompactNode {
    /// `blocks` must be non-empty; compaction always seeds a node with one block.
    pub fn new(id: NodeId, blocks: Vec<BasicBlock>, successor_pcs: Vec<usize>) -> Self {
        let start_pc = blocks.first().map(|b| b.start_pc).unwrap_or_default();
        let end_pc = blocks.last().map(|b| b.end_pc).unwrap_or(start_pc);
        Self {
            id,
            start_pc,
            end_pc,
            blocks,
            incoming: BTreeSet::new(),
            outgoing: BTreeSet::new(),
            predicate: None,
            immediate_dominator: None,
            successor_pcs,
        }
    }

    pub fn method(&self) -> &str {
        &self.id.method
    }

    pub fn first_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn last_block(&self) -> Option<&BasicBlock> {
        self.blocks.last()
    }

    pub fn last_opcode(&self) -> Option<&str> {
        self.last_block().and_then(|b| b.last_opcode())
    }

    /// True if execution of the call frame ends in this node
    pub fn is_terminal(&self) -> bool {
        self.last_opcode().map(opcodes::is_terminal).unwrap_or(false)
    }

    pub fn is_revert_terminated(&self) -> bool {
        self.last_opcode() == Some(REVERT)
    }

    /// Dispatcher and fallback nodes never carry user branches
    pub fn is_entry_method(&self) -> bool {
        self.id.method == DISPATCHER || self.id.method == FALLBACK
    }

    /// True if `pc` falls inside the first block (used to identify the node
    /// execution lands in after a jump)
    pub fn first_block_contains(&self, pc: usize) -> bool {
        self.first_block().map(|b| b.contains_pc(pc)).unwrap_or(false)
    }

    /// Absorb `other` as the straight-line continuation of this node
    pub(crate) fn absorb(&mut self, other: CompactNode) {
        self.end_pc = other.end_pc;
        self.blocks.extend(other.blocks);
        self.successor_pcs = other.successor_pcs;
        self.outgoing = other.outgoing;
    }
}
