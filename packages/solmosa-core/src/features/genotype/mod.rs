//! Genotype: method-call sequences and their variation operators
//!
//! Covers ABI normalisation, literal pools scraped from the Solidity
//! source, random generation, crossover and mutation.

pub mod domain;
pub mod infrastructure;

pub use domain::{
    state_variable_getters, AbiType, ContractAbi, InputValue, MethodCall, MethodKind, MethodSpec,
    TestCase, ValuePools, UNRANKED,
};
pub use infrastructure::errors::GenotypeError;
pub use infrastructure::{crossover, mutate_string, scrape_pools, Mutator, TestCaseGenerator};
