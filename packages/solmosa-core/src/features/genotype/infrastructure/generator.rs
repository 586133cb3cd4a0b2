//! Random test-case generation

use super::errors::GenotypeError;
use super::numeric::{
    int_fits, random_int, random_u256_inclusive, random_uint, uint_fits,
};
use crate::config::{SequenceConfig, ValueConfig};
use crate::features::genotype::domain::{
    AbiType, ContractAbi, InputValue, MethodCall, MethodKind, MethodSpec, TestCase, ValuePools,
};
use alloy_primitives::{Address, U256};
use rand::seq::SliceRandom;
use rand::Rng;

const STRING_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ ";
const MAX_STRING_LENGTH: usize = 255;
const ZERO_ADDRESS_PROBABILITY: f64 = 0.05;
const POOL_PROBABILITY: f64 = 0.5;

/// Draws method calls and test cases for one contract
#[derive(Debug, Clone)]
pub struct TestCaseGenerator {
    abi: ContractAbi,
    /// Functions plus enabled pseudo-methods
    callable: Vec<MethodSpec>,
    pools: ValuePools,
    accounts: Vec<Address>,
    /// Constructor senders, all accounts unless configured
    deployers: Vec<Address>,
    sequence: SequenceConfig,
    values: ValueConfig,
}

impl TestCaseGenerator {
    pub fn new(
        abi: ContractAbi,
        pools: ValuePools,
        accounts: Vec<Address>,
        sequence: SequenceConfig,
        values: ValueConfig,
    ) -> Result<Self, GenotypeError> {
        if accounts.is_empty() {
            return Err(GenotypeError::NoAccounts);
        }

        let mut callable = abi.functions().to_vec();
        if sequence.pass_time {
            callable.push(MethodSpec::pass_time());
        }
        if sequence.pass_blocks {
            callable.push(MethodSpec::pass_blocks());
        }

        let deployers = if values.deploying_accounts.is_empty() {
            accounts.clone()
        } else {
            values.deploying_accounts.clone()
        };

        Ok(Self {
            abi,
            callable,
            pools,
            accounts,
            deployers,
            sequence,
            values,
        })
    }

    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    pub fn callable(&self) -> &[MethodSpec] {
        &self.callable
    }

    pub fn pools(&self) -> &ValuePools {
        &self.pools
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    pub fn deployers(&self) -> &[Address] {
        &self.deployers
    }

    pub fn sequence(&self) -> &SequenceConfig {
        &self.sequence
    }

    pub fn values(&self) -> &ValueConfig {
        &self.values
    }

    /// Constructor followed by `U(min_calls, max_calls)` random calls
    ///
    /// A contract without callable methods yields constructor-only tests.
    pub fn random_test_case<R: Rng + ?Sized>(&self, rng: &mut R) -> TestCase {
        let mut calls = vec![self.constructor_call(rng)];
        if !self.callable.is_empty() {
            let count = rng.gen_range(self.sequence.min_method_calls..=self.sequence.max_method_calls);
            for _ in 0..count {
                if let Some(spec) = self.callable.choose(rng) {
                    calls.push(self.call_for(spec, rng));
                }
            }
        }
        TestCase::new(calls)
    }

    pub fn random_method_call<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<MethodCall, GenotypeError> {
        let spec = self.callable.choose(rng).ok_or(GenotypeError::NoCallableMethods)?;
        Ok(self.call_for(spec, rng))
    }

    pub fn constructor_call<R: Rng + ?Sized>(&self, rng: &mut R) -> MethodCall {
        let spec = self.abi.constructor();
        let inputs = spec.inputs.iter().map(|ty| self.random_value(ty, rng)).collect();
        let sender = self.constructor_sender(rng);
        let value = if spec.payable { self.random_wei(rng) } else { U256::ZERO };
        MethodCall::new(spec, inputs, sender, value)
    }

    /// Fresh call of `spec` with random inputs, sender and value
    pub fn call_for<R: Rng + ?Sized>(&self, spec: &MethodSpec, rng: &mut R) -> MethodCall {
        match spec.kind {
            MethodKind::Constructor => self.constructor_call(rng),
            MethodKind::PassTime => MethodCall::new(
                spec,
                vec![InputValue::uint(self.sequence.pass_time_seconds)],
                self.random_sender(rng),
                U256::ZERO,
            ),
            MethodKind::PassBlocks => MethodCall::new(spec, vec![], self.random_sender(rng), U256::ZERO),
            MethodKind::Function => {
                let inputs = spec.inputs.iter().map(|ty| self.random_value(ty, rng)).collect();
                let sender = self.random_sender(rng);
                let value = if spec.payable { self.random_wei(rng) } else { U256::ZERO };
                MethodCall::new(spec, inputs, sender, value)
            }
        }
    }

    pub fn random_value<R: Rng + ?Sized>(&self, ty: &AbiType, rng: &mut R) -> InputValue {
        match ty {
            AbiType::Bool => InputValue::Bool(rng.gen()),
            AbiType::Uint(bits) => {
                let fitting: Vec<_> = self.pools.ints.iter().filter(|v| uint_fits(**v, *bits)).collect();
                match fitting.choose(rng) {
                    Some(v) if rng.gen_bool(POOL_PROBABILITY) => InputValue::Uint(v.into_raw()),
                    _ => InputValue::Uint(random_uint(rng, *bits)),
                }
            }
            AbiType::Int(bits) => {
                let fitting: Vec<_> = self.pools.ints.iter().filter(|v| int_fits(**v, *bits)).collect();
                match fitting.choose(rng) {
                    Some(v) if rng.gen_bool(POOL_PROBABILITY) => InputValue::Int(**v),
                    _ => InputValue::Int(random_int(rng, *bits)),
                }
            }
            AbiType::Address => InputValue::Address(self.random_address(rng)),
            AbiType::String => match self.pools.strings.choose(rng) {
                Some(s) if rng.gen_bool(POOL_PROBABILITY) => InputValue::Str(s.clone()),
                _ => InputValue::Str(random_string(rng)),
            },
            AbiType::Array(inner) => {
                let len = rng.gen_range(self.sequence.min_array_length..=self.sequence.max_array_length);
                InputValue::Array((0..len).map(|_| self.random_value(inner, rng)).collect())
            }
            AbiType::FixedArray(inner, len) => {
                InputValue::Array((0..*len).map(|_| self.random_value(inner, rng)).collect())
            }
        }
    }

    pub fn random_address<R: Rng + ?Sized>(&self, rng: &mut R) -> Address {
        if self.values.zero_address && rng.gen_bool(ZERO_ADDRESS_PROBABILITY) {
            return Address::ZERO;
        }
        match self.pools.addresses.choose(rng) {
            Some(address) if rng.gen_bool(POOL_PROBABILITY) => *address,
            _ => self.random_sender(rng),
        }
    }

    /// Uniform over the executor accounts
    pub fn random_sender<R: Rng + ?Sized>(&self, rng: &mut R) -> Address {
        self.accounts.choose(rng).copied().unwrap_or(self.accounts[0])
    }

    /// Uniform over the deploying accounts
    pub fn constructor_sender<R: Rng + ?Sized>(&self, rng: &mut R) -> Address {
        self.deployers.choose(rng).copied().unwrap_or(self.accounts[0])
    }

    pub fn random_wei<R: Rng + ?Sized>(&self, rng: &mut R) -> U256 {
        match self.pools.wei.choose(rng) {
            Some(wei) if rng.gen_bool(POOL_PROBABILITY) => *wei,
            _ => random_u256_inclusive(rng, self.max_wei()),
        }
    }

    pub fn max_wei(&self) -> U256 {
        U256::from(self.values.max_wei)
    }
}

pub(crate) fn random_char<R: Rng + ?Sized>(rng: &mut R) -> char {
    STRING_CHARSET[rng.gen_range(0..STRING_CHARSET.len())] as char
}

fn random_string<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(1..=MAX_STRING_LENGTH);
    (0..len).map(|_| random_char(rng)).collect()
}
