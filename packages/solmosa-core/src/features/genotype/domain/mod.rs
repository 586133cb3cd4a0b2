//! Genotype domain types

mod abi_type;
mod contract;
mod input_value;
mod method_call;
mod pools;
mod test_case;

pub use abi_type::AbiType;
pub use contract::{state_variable_getters, ContractAbi, MethodKind, MethodSpec, PASS_BLOCKS, PASS_TIME};
pub use input_value::InputValue;
pub use method_call::MethodCall;
pub use pools::ValuePools;
pub use test_case::{TestCase, UNRANKED};
