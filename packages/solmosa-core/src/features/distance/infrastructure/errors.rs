//! Scoring error types

use thiserror::Error;

/// Invariant breaches detected while turning traces into distances
///
/// All of these are fatal for the contract being scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("executor returned {received} results for {expected} calls")]
    CallCountMismatch { expected: usize, received: usize },

    /// Every call must enter through the dispatcher at pc 0
    #[error("trace of call {call} starts at pc {pc} instead of the dispatcher")]
    TraceStartsMidway { call: usize, pc: usize },

    #[error("cannot normalise -1")]
    NormaliseMinusOne,

    #[error("edge {edge} was never reached but has approach level 0")]
    ZeroApproachLevel { edge: usize },

    #[error("trace re-enters node {node} directly from itself")]
    SelfLoop { node: String },

    #[error("stack value '{value}' at pc {pc} is not a hex word")]
    MalformedStackValue { pc: usize, value: String },
}
