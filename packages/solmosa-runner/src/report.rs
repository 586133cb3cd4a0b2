//! Results file
//!
//! The whole report is rewritten after every job so an interrupted run
//! still leaves the finished rows on disk.

use crate::error::{ErrorCategory, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use solmosa_core::{SearchOutcome, Termination};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// One completed contract run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub contract: String,
    pub run: usize,
    /// `;` outside string literals in the source
    pub statements: usize,
    pub relevant_targets: usize,
    pub covered_targets: usize,
    pub generations: usize,
    pub termination: Termination,
    pub executor_seconds: f64,
    pub offchain_seconds: f64,
    pub total_seconds: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Method names of the covering test, keyed by CDG edge
    pub tests: BTreeMap<usize, Vec<String>>,
}

impl RunSummary {
    pub fn from_outcome(contract: impl Into<String>, run: usize, statements: usize, outcome: &SearchOutcome) -> Self {
        Self {
            contract: contract.into(),
            run,
            statements,
            relevant_targets: outcome.relevant_count(),
            covered_targets: outcome.covered_count(),
            generations: outcome.iterations,
            termination: outcome.termination,
            executor_seconds: outcome.executor_time.as_secs_f64(),
            offchain_seconds: outcome.search_time().as_secs_f64(),
            total_seconds: outcome.total_time.as_secs_f64(),
            started_at: outcome.started_at,
            finished_at: outcome.finished_at,
            tests: outcome
                .covering_tests()
                .map(|(edge, test)| (edge, test.method_names()))
                .collect(),
        }
    }
}

/// One contract run that ended in an error
#[derive(Debug, Clone, Serialize)]
pub struct FailedRun {
    pub contract: String,
    pub run: usize,
    pub error: String,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub summaries: Vec<RunSummary>,
    pub failures: Vec<FailedRun>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            summaries: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Count `;` outside string literals
pub fn statement_count(source: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in source.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                ';' => count += 1,
                _ => {}
            },
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_statement_count_ignores_strings() {
        let source = r#"
            uint x = 1;
            string s = "a;b;c";
            string t = 'it\'s; fine';
            require(x > 0, "no;");
        "#;
        assert_eq!(statement_count(source), 4);
        assert_eq!(statement_count(""), 0);
    }

    #[test]
    fn test_summary_from_empty_outcome() {
        let mut outcome = SearchOutcome::without_targets(vec![false, false], Utc::now());
        outcome.total_time = Duration::from_millis(1500);
        outcome.executor_time = Duration::from_millis(500);

        let summary = RunSummary::from_outcome("p/C", 1, 12, &outcome);
        assert_eq!(summary.relevant_targets, 0);
        assert_eq!(summary.covered_targets, 0);
        assert_eq!(summary.total_seconds, 1.5);
        assert_eq!(summary.offchain_seconds, 1.0);
        assert!(summary.tests.is_empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["termination"]["kind"], "no_relevant_targets");
        assert_eq!(json["statements"], 12);
    }

    #[test]
    fn test_report_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/results.json");

        let mut report = RunReport::new();
        report.failures.push(FailedRun {
            contract: "p/C".into(),
            run: 0,
            error: "boom".into(),
            category: ErrorCategory::Transient,
        });
        report.write(&path).unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["failures"][0]["category"], "transient");
        assert_eq!(written["summaries"].as_array().unwrap().len(), 0);
    }
}
