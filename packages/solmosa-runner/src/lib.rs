/*
 * Solmosa Runner - Multi-Contract Test Generation Driver
 *
 * Outer surface around solmosa-core:
 * - Run configuration (YAML v1) with an embedded search configuration
 * - Contract discovery (artifacts, recovered CFGs, Solidity sources)
 * - Process-backed transaction executor speaking JSON over stdin/stdout
 * - Per-contract job state machine and repeated executions
 * - JSON results with one summary row per completed run
 */

pub mod artifacts;
pub mod config;
pub mod error;
pub mod executor;
pub mod inspect;
pub mod job;
pub mod orchestrator;
pub mod report;

pub use artifacts::{discover_contracts, ContractArtifacts};
pub use config::{ExecutorSettings, RunnerConfig};
pub use error::{ErrorCategory, Result, RunnerError};
pub use executor::{CommandExecutor, CommandExecutorFactory, ExecutorFactory};
pub use inspect::inspect_cdg;
pub use job::{ContractJob, JobState};
pub use orchestrator::Orchestrator;
pub use report::{statement_count, FailedRun, RunReport, RunSummary};
