//! EVM opcode names as emitted by the CFG recovery tool
//!
//! Instructions carry their mnemonic as a string; these helpers keep the
//! spelling in one place.

pub const LT: &str = "LT";
pub const GT: &str = "GT";
pub const SLT: &str = "SLT";
pub const SGT: &str = "SGT";
pub const EQ: &str = "EQ";
pub const ISZERO: &str = "ISZERO";

pub const RETURN: &str = "RETURN";
pub const REVERT: &str = "REVERT";
pub const STOP: &str = "STOP";
pub const INVALID: &str = "INVALID";

pub const CALLVALUE: &str = "CALLVALUE";

/// Opcodes that end execution of the current call frame
pub const TERMINAL_OPCODES: [&str; 4] = [RETURN, REVERT, STOP, INVALID];

/// Comparison opcodes that can control a conditional jump
pub const COMPARISON_OPCODES: [&str; 5] = [LT, GT, SLT, SGT, EQ];

/// True if `name` halts the call frame
pub fn is_terminal(name: &str) -> bool {
    TERMINAL_OPCODES.contains(&name)
}

/// True if `name` is a two-operand comparison
pub fn is_comparison(name: &str) -> bool {
    COMPARISON_OPCODES.contains(&name)
}
