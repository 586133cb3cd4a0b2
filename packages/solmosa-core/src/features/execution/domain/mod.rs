//! Executor wire model

use crate::features::distance::ScoringError;
use crate::features::genotype::{InputValue, MethodCall};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Stack at one executed instruction, top of stack last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSnapshot {
    pub pc: usize,
    #[serde(default)]
    pub stack: Vec<String>,
}

impl StackSnapshot {
    pub fn new(pc: usize, stack: Vec<String>) -> Self {
        Self { pc, stack }
    }

    /// Top of stack
    pub fn s1(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// Second stack item
    pub fn s2(&self) -> Option<&str> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i].as_str())
    }
}

/// Outcome of one call
///
/// Sentinel variants mark calls that are recorded but never scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CallResult {
    #[serde(rename = "executed")]
    Executed {
        trace: Vec<StackSnapshot>,
        #[serde(default)]
        return_value: Option<String>,
    },
    /// Sender could not pay for the call
    #[serde(rename = "Out of Ether")]
    OutOfEther,
    #[serde(rename = "passTime")]
    PassTime,
    #[serde(rename = "passBlocks")]
    PassBlocks,
}

impl CallResult {
    pub fn executed(trace: Vec<StackSnapshot>) -> Self {
        Self::Executed {
            trace,
            return_value: None,
        }
    }

    /// Value recorded on the test case for this call
    pub fn return_value(&self) -> String {
        match self {
            CallResult::Executed { return_value, .. } => return_value.clone().unwrap_or_default(),
            CallResult::OutOfEther => "Out of Ether".to_string(),
            CallResult::PassTime => "passTime".to_string(),
            CallResult::PassBlocks => "passBlocks".to_string(),
        }
    }
}

/// One call as submitted to the executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// ABI name (`constructor`, `transfer`, `passTime`, ...)
    pub method: String,
    /// Full signature, disambiguates overloads
    pub signature: String,
    pub inputs: Vec<InputValue>,
    pub sender: Address,
    pub value: U256,
}

impl From<&MethodCall> for CallRequest {
    fn from(call: &MethodCall) -> Self {
        Self {
            method: call.method.clone(),
            signature: call.signature.clone(),
            inputs: call.inputs.clone(),
            sender: call.sender,
            value: call.value,
        }
    }
}

/// Slice a flat result list into consecutive chunks of `counts[i]` calls
pub fn split_by_counts(
    results: Vec<CallResult>,
    counts: &[usize],
) -> Result<Vec<Vec<CallResult>>, ScoringError> {
    let expected: usize = counts.iter().sum();
    if results.len() != expected {
        return Err(ScoringError::CallCountMismatch {
            expected,
            received: results.len(),
        });
    }

    let mut remaining = results.into_iter();
    Ok(counts
        .iter()
        .map(|&count| remaining.by_ref().take(count).collect())
        .collect())
}
