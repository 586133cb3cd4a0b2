use crate::artifacts::{discover_contracts, ContractArtifacts};
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::executor::ExecutorFactory;
use crate::job::ContractJob;
use crate::report::{statement_count, FailedRun, RunReport, RunSummary};
use solmosa_core::{GenerateTestsUseCase, SearchOutcome};
use tracing::{error, info};

/// Runs every discovered contract `execution_times` times
///
/// A failing run is recorded and the remaining runs continue.
pub struct Orchestrator<F: ExecutorFactory> {
    config: RunnerConfig,
    factory: F,
}

impl<F: ExecutorFactory> Orchestrator<F> {
    pub fn new(config: RunnerConfig, factory: F) -> Self {
        Self { config, factory }
    }

    pub fn run(&self) -> Result<RunReport> {
        let contracts = discover_contracts(&self.config.contracts_dir, &self.config.skip)?;
        info!(
            contracts = contracts.len(),
            runs_each = self.config.execution_times,
            search = %self.config.search.describe(),
            "starting test generation"
        );

        let mut report = RunReport::new();
        for contract in &contracts {
            for run in 0..self.config.execution_times {
                let mut job = ContractJob::new_queued(contract.display_name(), run);
                job.start()?;

                match self.run_once(contract, run) {
                    Ok((outcome, statements)) => {
                        job.complete(outcome.covered_count(), outcome.relevant_count())?;
                        info!(
                            contract = %job.contract,
                            run,
                            covered = outcome.covered_count(),
                            relevant = outcome.relevant_count(),
                            termination = %outcome.termination,
                            "run completed"
                        );
                        report
                            .summaries
                            .push(RunSummary::from_outcome(job.contract.clone(), run, statements, &outcome));
                    }
                    Err(e) => {
                        error!(contract = %job.contract, run, error = %e, "run failed");
                        job.fail(&e)?;
                        report.failures.push(FailedRun {
                            contract: job.contract.clone(),
                            run,
                            error: e.to_string(),
                            category: e.category(),
                        });
                    }
                }
                report.write(&self.config.results)?;
            }
        }

        info!(
            completed = report.summaries.len(),
            failed = report.failures.len(),
            results = %self.config.results.display(),
            "test generation finished"
        );
        Ok(report)
    }

    fn run_once(&self, artifacts: &ContractArtifacts, run: usize) -> Result<(SearchOutcome, usize)> {
        let contract = artifacts.load()?;
        let statements = contract.source.as_deref().map(statement_count).unwrap_or(0);

        // Repetitions of a seeded run must differ
        let mut search = self.config.search.clone();
        search.seed = search.seed.map(|s| s.wrapping_add(run as u64));

        let executor = self.factory.create(&contract)?;
        let outcome = GenerateTestsUseCase::new(executor, search).execute(&contract)?;
        Ok((outcome, statements))
    }
}
