use alloy_primitives::{Address, I256, U256};

/// Literals scraped from the contract source, used to bias generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuePools {
    pub addresses: Vec<Address>,
    /// Ether amounts already converted to wei
    pub wei: Vec<U256>,
    pub ints: Vec<I256>,
    pub strings: Vec<String>,
}

impl ValuePools {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.wei.is_empty() && self.ints.is_empty() && self.strings.is_empty()
    }
}
