use super::contract::{MethodKind, MethodSpec};
use super::input_value::InputValue;
use alloy_primitives::{Address, U256};

/// One transaction of a test case
///
/// Variation operators replace calls wholesale instead of editing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub signature: String,
    pub inputs: Vec<InputValue>,
    pub sender: Address,
    pub value: U256,
    pub payable: bool,
    pub kind: MethodKind,
}

impl MethodCall {
    pub fn new(spec: &MethodSpec, inputs: Vec<InputValue>, sender: Address, value: U256) -> Self {
        Self {
            method: spec.name.clone(),
            signature: spec.signature.clone(),
            inputs,
            sender,
            value,
            payable: spec.payable,
            kind: spec.kind,
        }
    }

    pub fn with_inputs(&self, inputs: Vec<InputValue>) -> Self {
        Self {
            inputs,
            ..self.clone()
        }
    }

    pub fn with_sender(&self, sender: Address) -> Self {
        Self {
            sender,
            ..self.clone()
        }
    }

    pub fn with_value(&self, value: U256) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    pub fn is_pseudo(&self) -> bool {
        self.kind.is_pseudo()
    }
}
