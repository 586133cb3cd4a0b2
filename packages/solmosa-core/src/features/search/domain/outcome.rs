use crate::features::genotype::TestCase;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Why the search stopped; every variant is a normal outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Every relevant target archived at this generation
    Covered { generation: usize },
    BudgetExhausted,
    /// Nothing to cover; the search never started
    NoRelevantTargets,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Covered { generation } => write!(f, "covered at generation {}", generation),
            Termination::BudgetExhausted => write!(f, "budget exhausted"),
            Termination::NoRelevantTargets => write!(f, "no relevant targets"),
        }
    }
}

/// Per-generation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub covered: usize,
    pub active_targets: usize,
}

/// Result of one search run, read by reporting
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub termination: Termination,
    /// Generations executed after the initial population
    pub iterations: usize,
    pub relevant: Vec<bool>,
    /// Covering test per CDG edge
    pub archive: Vec<Option<TestCase>>,
    pub generations: Vec<GenerationStats>,
    pub total_time: Duration,
    pub executor_time: Duration,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchOutcome {
    pub fn relevant_count(&self) -> usize {
        self.relevant.iter().filter(|&&r| r).count()
    }

    pub fn covered_count(&self) -> usize {
        self.archive
            .iter()
            .zip(&self.relevant)
            .filter(|(slot, &relevant)| relevant && slot.is_some())
            .count()
    }

    pub fn is_fully_covered(&self) -> bool {
        self.covered_count() == self.relevant_count()
    }

    /// Wall time spent outside the executor
    pub fn search_time(&self) -> Duration {
        self.total_time.saturating_sub(self.executor_time)
    }

    /// (edge, tests) for each covered relevant target
    pub fn covering_tests(&self) -> impl Iterator<Item = (usize, &TestCase)> {
        self.archive
            .iter()
            .enumerate()
            .zip(&self.relevant)
            .filter_map(|((edge, slot), &relevant)| if relevant { slot.as_ref().map(|t| (edge, t)) } else { None })
    }
}
