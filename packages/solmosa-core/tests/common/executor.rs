//! Scripted executor for the fixture contracts
//!
//! Fabricates the trace a real EVM would produce for `check(uint256)`
//! on the threshold fixture, so searches and scoring can be checked
//! deterministically.

use super::fixtures::*;
use alloy_primitives::{Address, U256};
use solmosa_core::{CallRequest, CallResult, ExecutorError, InputValue, StackSnapshot, TransactionExecutor};

#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    /// Calls per submitted batch
    pub batches: Vec<usize>,
    pub account_requests: usize,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_calls(&self) -> usize {
        self.batches.iter().sum()
    }
}

impl TransactionExecutor for ScriptedExecutor {
    fn accounts(&mut self, count: usize) -> Result<Vec<Address>, ExecutorError> {
        self.account_requests += 1;
        Ok((0..count).map(|i| Address::repeat_byte(i as u8 + 1)).collect())
    }

    fn execute(&mut self, calls: &[CallRequest]) -> Result<Vec<CallResult>, ExecutorError> {
        self.batches.push(calls.len());
        calls.iter().map(scripted_result).collect()
    }
}

fn scripted_result(call: &CallRequest) -> Result<CallResult, ExecutorError> {
    match call.method.as_str() {
        "constructor" => Ok(CallResult::executed(vec![StackSnapshot::new(0, vec![])])),
        "passTime" => Ok(CallResult::PassTime),
        "passBlocks" => Ok(CallResult::PassBlocks),
        "check" => match call.inputs.first() {
            Some(InputValue::Uint(x)) if call.value.is_zero() => Ok(CallResult::executed(check_trace(*x))),
            Some(InputValue::Uint(_)) => Ok(CallResult::executed(reverted_check_trace())),
            other => Err(ExecutorError::Protocol(format!("bad check input: {:?}", other))),
        },
        _ => Ok(CallResult::executed(fallback_trace())),
    }
}

fn hex(value: U256) -> String {
    format!("0x{:x}", value)
}

fn snapshots(pcs: &[usize]) -> Vec<StackSnapshot> {
    pcs.iter().map(|&pc| StackSnapshot::new(pc, vec![])).collect()
}

fn dispatcher_trace(selector_matches: bool) -> Vec<StackSnapshot> {
    let mut trace = snapshots(DISPATCHER_PCS);
    let other = if selector_matches { "0x1" } else { "0x2" };
    for snap in &mut trace {
        if snap.pc == EQ_PC {
            snap.stack = vec!["0x1".to_string(), other.to_string()];
        }
    }
    trace
}

/// Trace of a successful `check(x)` call
pub fn check_trace(x: U256) -> Vec<StackSnapshot> {
    let mut trace = dispatcher_trace(true);
    trace.extend(snapshots(GUARD_PCS));
    for &pc in CONDITION_PCS {
        let stack = if pc == GT_PC {
            vec!["0x5".to_string(), hex(x)]
        } else {
            vec![]
        };
        trace.push(StackSnapshot::new(pc, stack));
    }
    if x > U256::from(5u8) {
        trace.extend(snapshots(ABOVE_PCS));
    } else {
        trace.extend(snapshots(AT_MOST_PCS));
    }
    trace
}

/// `check` called with value: the non-payable guard reverts
pub fn reverted_check_trace() -> Vec<StackSnapshot> {
    let mut trace = dispatcher_trace(true);
    trace.extend(snapshots(GUARD_PCS));
    trace.extend(snapshots(REVERT_PCS));
    trace
}

/// Unknown selector: dispatcher then fallback
pub fn fallback_trace() -> Vec<StackSnapshot> {
    let mut trace = dispatcher_trace(false);
    trace.push(StackSnapshot::new(9, vec![]));
    trace
}
