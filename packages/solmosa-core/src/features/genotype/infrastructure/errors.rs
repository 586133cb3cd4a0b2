//! Genotype error types

use thiserror::Error;

/// ABI handling and generation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenotypeError {
    /// ABI parameter type the value generator cannot produce
    #[error("unsupported ABI type '{ty}'")]
    UnsupportedType { ty: String },

    #[error("artifact has no '{field}' field")]
    MissingField { field: &'static str },

    #[error("malformed ABI entry: {0}")]
    MalformedAbi(String),

    #[error("no accounts available to send transactions")]
    NoAccounts,

    #[error("contract has no callable methods")]
    NoCallableMethods,
}

impl GenotypeError {
    pub fn unsupported(ty: impl Into<String>) -> Self {
        Self::UnsupportedType { ty: ty.into() }
    }
}
