//! Mutation operators
//!
//! Each operator replaces calls with fresh ones built from the old call;
//! the constructor at index 0 is never removed or displaced.

use super::generator::{random_char, TestCaseGenerator};
use super::numeric::{int_max, int_min, uint_max};
use crate::config::GeneticConfig;
use crate::features::genotype::domain::{AbiType, InputValue, MethodCall, TestCase};
use alloy_primitives::{I256, U256};
use rand::seq::SliceRandom;
use rand::Rng;

const INPUT_CHANGE_PROBABILITY: f64 = 0.9;
const SENDER_CHANGE_PROBABILITY: f64 = 0.1;
const VALUE_CHANGE_PROBABILITY: f64 = 0.1;
const MAX_INT_DELTA: u64 = 10;
const MAX_STRING_LENGTH: usize = 255;

pub struct Mutator<'a> {
    generator: &'a TestCaseGenerator,
    remove_probability: f64,
    change_probability: f64,
    insert_probability: f64,
}

impl<'a> Mutator<'a> {
    pub fn new(generator: &'a TestCaseGenerator, genetic: &GeneticConfig) -> Self {
        Self {
            generator,
            remove_probability: genetic.remove_probability,
            change_probability: genetic.change_probability,
            insert_probability: genetic.insert_probability,
        }
    }

    /// Apply remove, change and insert, each with its own probability
    ///
    /// Fitness is reset only when the call sequence actually changed.
    pub fn mutate<R: Rng + ?Sized>(&self, test_case: &mut TestCase, rng: &mut R) {
        let mut calls = test_case.calls().to_vec();

        if rng.gen_bool(self.remove_probability) {
            calls = self.remove(calls, rng);
        }
        if rng.gen_bool(self.change_probability) {
            calls = self.change(calls, rng);
        }
        if rng.gen_bool(self.insert_probability) {
            calls = self.insert(calls, rng);
        }

        if calls.as_slice() != test_case.calls() {
            test_case.set_calls(calls);
        }
    }

    fn remove<R: Rng + ?Sized>(&self, calls: Vec<MethodCall>, rng: &mut R) -> Vec<MethodCall> {
        let p = 1.0 / calls.len() as f64;
        calls
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i == 0 || !rng.gen_bool(p))
            .map(|(_, call)| call)
            .collect()
    }

    fn change<R: Rng + ?Sized>(&self, calls: Vec<MethodCall>, rng: &mut R) -> Vec<MethodCall> {
        let p = 1.0 / calls.len() as f64;
        calls
            .into_iter()
            .enumerate()
            .map(|(i, call)| if rng.gen_bool(p) { self.change_call(&call, i == 0, rng) } else { call })
            .collect()
    }

    fn change_call<R: Rng + ?Sized>(&self, call: &MethodCall, is_constructor: bool, rng: &mut R) -> MethodCall {
        if call.is_pseudo() {
            return call.clone();
        }
        let spec = if is_constructor {
            Some(self.generator.abi().constructor())
        } else {
            self.generator.abi().find(&call.signature)
        };
        let Some(spec) = spec else {
            return call.clone();
        };

        let mut changed = call.clone();
        if !call.inputs.is_empty() && rng.gen_bool(INPUT_CHANGE_PROBABILITY) {
            let p = 1.0 / call.inputs.len() as f64;
            let inputs = call
                .inputs
                .iter()
                .zip(&spec.inputs)
                .map(|(value, ty)| {
                    if rng.gen_bool(p) {
                        self.mutate_input(value, ty, rng)
                    } else {
                        value.clone()
                    }
                })
                .collect();
            changed = changed.with_inputs(inputs);
        }
        if !is_constructor && rng.gen_bool(SENDER_CHANGE_PROBABILITY) {
            changed = changed.with_sender(self.generator.random_sender(rng));
        }
        if call.payable && rng.gen_bool(VALUE_CHANGE_PROBABILITY) {
            changed = changed.with_value(self.nudge_value(call.value, rng));
        }
        changed
    }

    fn insert<R: Rng + ?Sized>(&self, mut calls: Vec<MethodCall>, rng: &mut R) -> Vec<MethodCall> {
        let limit = self.generator.sequence().max_method_calls + 1;
        let mut inserted = 0i32;
        while calls.len() < limit {
            let Ok(call) = self.generator.random_method_call(rng) else {
                break;
            };
            let position = rng.gen_range(1..=calls.len());
            calls.insert(position, call);
            inserted += 1;
            if !rng.gen_bool(0.5f64.powi(inserted)) {
                break;
            }
        }
        calls
    }

    fn mutate_input<R: Rng + ?Sized>(&self, value: &InputValue, ty: &AbiType, rng: &mut R) -> InputValue {
        match (value, ty) {
            (InputValue::Bool(b), AbiType::Bool) => InputValue::Bool(!b),
            (InputValue::Uint(v), AbiType::Uint(bits)) => {
                let delta = U256::from(rng.gen_range(1..=MAX_INT_DELTA));
                let shifted = if rng.gen() {
                    v.saturating_add(delta).min(uint_max(*bits))
                } else {
                    v.saturating_sub(delta)
                };
                InputValue::Uint(shifted)
            }
            (InputValue::Int(v), AbiType::Int(bits)) => {
                let delta = I256::from_raw(U256::from(rng.gen_range(1..=MAX_INT_DELTA)));
                let shifted = if rng.gen() {
                    v.saturating_add(delta).min(int_max(*bits))
                } else {
                    v.saturating_sub(delta).max(int_min(*bits))
                };
                InputValue::Int(shifted)
            }
            (InputValue::Str(s), AbiType::String) => match self.generator.pools().strings.choose(rng) {
                Some(pooled) if rng.gen_bool(0.5) => InputValue::Str(pooled.clone()),
                _ => InputValue::Str(mutate_string(s, rng)),
            },
            (InputValue::Array(items), AbiType::Array(inner) | AbiType::FixedArray(inner, _)) => {
                if items.is_empty() {
                    return value.clone();
                }
                let p = 1.0 / items.len() as f64;
                InputValue::Array(
                    items
                        .iter()
                        .map(|item| if rng.gen_bool(p) { self.mutate_input(item, inner, rng) } else { item.clone() })
                        .collect(),
                )
            }
            // Addresses, and values that no longer match their type, are resampled
            _ => self.generator.random_value(ty, rng),
        }
    }

    /// Shift by up to a tenth of `max_wei`, clamped to `[0, max_wei]`
    fn nudge_value<R: Rng + ?Sized>(&self, value: U256, rng: &mut R) -> U256 {
        let max_wei = self.generator.max_wei();
        let step = super::numeric::random_u256_inclusive(rng, max_wei / U256::from(10u8));
        if rng.gen() {
            value.saturating_add(step).min(max_wei)
        } else {
            value.saturating_sub(step)
        }
    }
}

/// Character-level remove, change and insert, each with probability 1/3
pub fn mutate_string<R: Rng + ?Sized>(value: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = value.chars().collect();

    if !chars.is_empty() && rng.gen_bool(1.0 / 3.0) {
        let p = 1.0 / chars.len() as f64;
        chars.retain(|_| !rng.gen_bool(p));
    }
    if !chars.is_empty() && rng.gen_bool(1.0 / 3.0) {
        let p = 1.0 / chars.len() as f64;
        for c in chars.iter_mut() {
            if rng.gen_bool(p) {
                *c = random_char(rng);
            }
        }
    }
    if rng.gen_bool(1.0 / 3.0) {
        let mut inserted = 0i32;
        while chars.len() < MAX_STRING_LENGTH {
            let position = rng.gen_range(0..=chars.len());
            chars.insert(position, random_char(rng));
            inserted += 1;
            if !rng.gen_bool(0.5f64.powi(inserted)) {
                break;
            }
        }
    }

    chars.into_iter().collect()
}
