use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};

/// One concrete argument of a method call
///
/// Integers travel as decimal strings so the executor never loses
/// precision on 256-bit values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    Bool(bool),
    Uint(#[serde(with = "decimal_u256")] U256),
    Int(#[serde(with = "decimal_i256")] I256),
    Address(Address),
    #[serde(rename = "string")]
    Str(String),
    Array(Vec<InputValue>),
}

impl InputValue {
    pub fn uint(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

mod decimal_u256 {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let text = String::deserialize(deserializer)?;
        U256::from_str(&text).map_err(D::Error::custom)
    }
}

mod decimal_i256 {
    use alloy_primitives::I256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &I256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<I256, D::Error> {
        let text = String::deserialize(deserializer)?;
        I256::from_dec_str(&text).map_err(D::Error::custom)
    }
}
