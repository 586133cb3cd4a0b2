use crate::error::{ErrorCategory, Result, RunnerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of one contract run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobState {
    Queued {
        queued_at: DateTime<Utc>,
    },
    Running {
        started_at: DateTime<Utc>,
    },
    Completed {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        duration_ms: u64,
        covered: usize,
        relevant: usize,
    },
    Failed {
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
        error: String,
        error_category: ErrorCategory,
    },
}

impl JobState {
    pub fn state_name(&self) -> &'static str {
        match self {
            JobState::Queued { .. } => "queued",
            JobState::Running { .. } => "running",
            JobState::Completed { .. } => "completed",
            JobState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }
}

/// One execution of the search on one contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractJob {
    pub id: Uuid,
    pub contract: String,
    /// Repetition index, starting at 0
    pub run: usize,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContractJob {
    pub fn new_queued(contract: impl Into<String>, run: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            contract: contract.into(),
            run,
            state: JobState::Queued { queued_at: now },
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition: QUEUED → RUNNING
    pub fn start(&mut self) -> Result<()> {
        match &self.state {
            JobState::Queued { .. } => {
                let now = Utc::now();
                self.state = JobState::Running { started_at: now };
                self.updated_at = now;
                Ok(())
            }
            _ => Err(self.invalid_transition("running")),
        }
    }

    /// Transition: RUNNING → COMPLETED
    pub fn complete(&mut self, covered: usize, relevant: usize) -> Result<()> {
        match &self.state {
            JobState::Running { started_at } => {
                let now = Utc::now();
                let duration_ms = (now - *started_at).num_milliseconds().max(0) as u64;
                self.state = JobState::Completed {
                    started_at: *started_at,
                    completed_at: now,
                    duration_ms,
                    covered,
                    relevant,
                };
                self.updated_at = now;
                Ok(())
            }
            _ => Err(self.invalid_transition("completed")),
        }
    }

    /// Transition: RUNNING → FAILED
    pub fn fail(&mut self, error: &RunnerError) -> Result<()> {
        match &self.state {
            JobState::Running { started_at } => {
                let now = Utc::now();
                self.state = JobState::Failed {
                    started_at: *started_at,
                    failed_at: now,
                    error: error.to_string(),
                    error_category: error.category(),
                };
                self.updated_at = now;
                Ok(())
            }
            _ => Err(self.invalid_transition("failed")),
        }
    }

    fn invalid_transition(&self, to: &str) -> RunnerError {
        RunnerError::InvalidStateTransition {
            from: self.state.state_name().to_string(),
            to: to.to_string(),
        }
    }
}
