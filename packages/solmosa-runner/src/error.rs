use solmosa_core::config::ConfigError;
use solmosa_core::{ExecutorError, SolmosaError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RunnerError>;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Search failed: {0}")]
    Search(#[from] SolmosaError),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("Contract discovery failed: {0}")]
    Discovery(String),

    #[error("Invalid job state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RunnerError {
    pub fn discovery<E: fmt::Display>(e: E) -> Self {
        Self::Discovery(e.to_string())
    }

    pub fn invalid_config<E: fmt::Display>(e: E) -> Self {
        Self::InvalidConfig(e.to_string())
    }

    /// Executor process trouble may go away on a rerun; everything else
    /// is a property of the contract or the configuration
    pub fn category(&self) -> ErrorCategory {
        match self {
            RunnerError::Executor(e) | RunnerError::Search(SolmosaError::Executor(e)) => match e {
                ExecutorError::Spawn(_) | ExecutorError::Status { .. } | ExecutorError::Io(_) => {
                    ErrorCategory::Transient
                }
                ExecutorError::Protocol(_) | ExecutorError::NotEnoughAccounts { .. } => ErrorCategory::Permanent,
            },
            RunnerError::Io(_) => ErrorCategory::Transient,
            _ => ErrorCategory::Permanent,
        }
    }
}

/// Failure category recorded on failed jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Executor or filesystem hiccup, a rerun may succeed
    Transient,
    /// Unsupported contract or broken input
    Permanent,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transient => "transient",
            ErrorCategory::Permanent => "permanent",
        }
    }
}

impl FromStr for ErrorCategory {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "transient" => Ok(ErrorCategory::Transient),
            "permanent" => Ok(ErrorCategory::Permanent),
            _ => Err(RunnerError::invalid_config(format!("Invalid error category: {}", s))),
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solmosa_core::CdgError;

    #[test]
    fn test_error_category_roundtrip() {
        for category in [ErrorCategory::Transient, ErrorCategory::Permanent] {
            assert_eq!(category.as_str().parse::<ErrorCategory>().unwrap(), category);
        }
        assert!("infrastructure".parse::<ErrorCategory>().is_err());
    }

    #[test]
    fn test_categories() {
        let spawn: RunnerError = ExecutorError::Spawn("no such file".into()).into();
        assert_eq!(spawn.category(), ErrorCategory::Transient);

        let nested: RunnerError = SolmosaError::from(ExecutorError::Status {
            status: 1,
            stderr: "boom".into(),
        })
        .into();
        assert_eq!(nested.category(), ErrorCategory::Transient);

        let structural: RunnerError = SolmosaError::from(CdgError::EmptyGraph).into();
        assert_eq!(structural.category(), ErrorCategory::Permanent);

        let protocol: RunnerError = ExecutorError::protocol("truncated").into();
        assert_eq!(protocol.category(), ErrorCategory::Permanent);
    }
}
