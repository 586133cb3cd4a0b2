//! Unified error types for solmosa-core
//!
//! Each feature keeps its own error enum; this module folds them into one
//! type for callers that drive the whole pipeline.

use crate::config::ConfigError;
use crate::features::cdg::CdgError;
use crate::features::distance::ScoringError;
use crate::features::execution::ExecutorError;
use crate::features::genotype::GenotypeError;
use crate::features::search::SearchError;
use thiserror::Error;

/// Result type alias for solmosa operations
pub type Result<T> = std::result::Result<T, SolmosaError>;

/// Main error type for solmosa operations
#[derive(Debug, Error)]
pub enum SolmosaError {
    /// Control-dependency graph construction failed (unsupported bytecode shape)
    #[error("CDG construction failed: {0}")]
    Cdg(#[from] CdgError),

    /// Trace scoring broke an invariant
    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    /// ABI or genotype handling failed
    #[error("Genotype error: {0}")]
    Genotype(#[from] GenotypeError),

    /// Population accounting failed during the search
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Transaction executor collaborator failed
    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON decoding error (artifacts, CFG dumps)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl SolmosaError {
    /// Create a generic error with a message
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// True for errors that signal an unsupported contract shape rather
    /// than a broken run
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SolmosaError::Cdg(_) | SolmosaError::Genotype(GenotypeError::UnsupportedType { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        let err: SolmosaError = CdgError::MergeShape {
            node: "transfer(address,uint256)#3".to_string(),
            outgoing: 0,
            incoming: 1,
        }
        .into();
        assert!(err.is_structural());
        assert!(err.to_string().contains("CDG construction failed"));

        let err = SolmosaError::other("boom");
        assert!(!err.is_structural());
    }
}
