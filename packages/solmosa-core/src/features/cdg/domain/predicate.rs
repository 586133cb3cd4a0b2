use super::node::NodeIdx;
use crate::shared::opcodes;
use serde::{Deserialize, Serialize};

/// Comparison controlling a conditional jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PredicateKind {
    Lt,
    Gt,
    Slt,
    Sgt,
    Eq,
    IsZero,
    /// No controlling comparison could be located
    None,
}

impl PredicateKind {
    pub fn from_opcode(opcode: &str) -> Option<Self> {
        match opcode {
            opcodes::LT => Some(Self::Lt),
            opcodes::GT => Some(Self::Gt),
            opcodes::SLT => Some(Self::Slt),
            opcodes::SGT => Some(Self::Sgt),
            opcodes::EQ => Some(Self::Eq),
            opcodes::ISZERO => Some(Self::IsZero),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Slt => "SLT",
            Self::Sgt => "SGT",
            Self::Eq => "EQ",
            Self::IsZero => "ISZERO",
            Self::None => "NONE",
        }
    }
}

/// Controlling comparison of a dominator edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub kind: PredicateKind,
    /// pc of the comparison, or the block start for `None`
    pub pc: usize,
    /// Node whose final block holds the comparison
    pub owner: NodeIdx,
}

impl Predicate {
    pub fn new(kind: PredicateKind, pc: usize, owner: NodeIdx) -> Self {
        Self { kind, pc, owner }
    }

    pub fn none(pc: usize, owner: NodeIdx) -> Self {
        Self::new(PredicateKind::None, pc, owner)
    }

    pub fn is_none(&self) -> bool {
        self.kind == PredicateKind::None
    }
}
