//! Shared vocabulary used across feature slices

pub mod opcodes;

pub use opcodes::{is_comparison, is_terminal, CALLVALUE, ISZERO, REVERT};
