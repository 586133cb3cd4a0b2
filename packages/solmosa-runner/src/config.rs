//! Run configuration (YAML v1)
//!
//! ```yaml
//! version: 1
//! executor:
//!   program: node
//!   args: ["executor/run.js"]
//! contracts_dir: contracts
//! results: results/run.json
//! execution_times: 3
//! skip: ["Migrations.json"]
//! search:
//!   preset: quick
//!   seed: 42
//!   overrides:
//!     genetic:
//!       search_budget: 20
//! ```

use crate::error::{Result, RunnerError};
use serde::{Deserialize, Serialize};
use solmosa_core::config::{SearchConfig, SearchConfigFileV1, SearchOverrides};
use std::path::{Path, PathBuf};

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// How to start the transaction executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorSettings {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Search section: a preset plus optional overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub overrides: Option<SearchOverrides>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunnerConfigFileV1 {
    version: Option<u32>,
    executor: ExecutorSettings,
    contracts_dir: PathBuf,
    #[serde(default = "default_results")]
    results: PathBuf,
    #[serde(default = "default_execution_times")]
    execution_times: usize,
    #[serde(default = "default_skip")]
    skip: Vec<String>,
    #[serde(default)]
    search: SearchSection,
}

fn default_results() -> PathBuf {
    PathBuf::from("results.json")
}

fn default_execution_times() -> usize {
    1
}

fn default_skip() -> Vec<String> {
    vec!["Migrations.json".to_string()]
}

/// Resolved run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub executor: ExecutorSettings,
    pub contracts_dir: PathBuf,
    pub results: PathBuf,
    /// Repetitions per contract
    pub execution_times: usize,
    /// Artifact file names never tested
    pub skip: Vec<String>,
    pub search: SearchConfig,
}

impl RunnerConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: RunnerConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file
            .version
            .ok_or_else(|| RunnerError::invalid_config("missing 'version' field, add 'version: 1'"))?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(RunnerError::invalid_config(format!(
                "unsupported version {}, supported: 1",
                version
            )));
        }
        if file.execution_times == 0 {
            return Err(RunnerError::invalid_config("execution_times must be at least 1"));
        }

        let search = SearchConfigFileV1 {
            version: Some(1),
            preset: file.search.preset,
            seed: file.search.seed,
            overrides: file.search.overrides,
        }
        .resolve()?;

        Ok(Self {
            executor: file.executor,
            contracts_dir: file.contracts_dir,
            results: file.results,
            execution_times: file.execution_times,
            skip: file.skip,
            search,
        })
    }

    /// Load a config file; relative paths are resolved against its directory
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;

        if let Some(base) = path.parent() {
            config.contracts_dir = base.join(&config.contracts_dir);
            config.results = base.join(&config.results);
        }
        Ok(config)
    }

    pub fn is_skipped(&self, artifact_file: &str) -> bool {
        self.skip.iter().any(|s| s == artifact_file)
    }
}
