//! DynaMOSA generational loop

use super::environmental_selection;
use super::offspring::generate_offspring;
use super::preference_sorting::{preference_sorting, subvector_distance};
use crate::config::GeneticConfig;
use crate::errors::Result;
use crate::features::cdg::ControlDependencyGraph;
use crate::features::distance::{ApproachLevelMatrix, FitnessEvaluator};
use crate::features::execution::{split_by_counts, CallRequest, TransactionExecutor};
use crate::features::genotype::{TestCase, TestCaseGenerator};
use crate::features::search::domain::{active_targets, Archive, GenerationStats, SearchOutcome, Termination};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// One search over one contract
///
/// Owns the per-contract state (parents, archive, targets) for the
/// duration of `run`; each generation is one blocking executor batch.
pub struct DynaMosa<'a, E: TransactionExecutor> {
    cdg: &'a ControlDependencyGraph,
    approach_levels: &'a ApproachLevelMatrix,
    relevant: Vec<bool>,
    generator: &'a TestCaseGenerator,
    genetic: GeneticConfig,
    executor: E,
    executor_time: Duration,
}

impl<'a, E: TransactionExecutor> DynaMosa<'a, E> {
    pub fn new(
        cdg: &'a ControlDependencyGraph,
        approach_levels: &'a ApproachLevelMatrix,
        relevant: Vec<bool>,
        generator: &'a TestCaseGenerator,
        genetic: GeneticConfig,
        executor: E,
    ) -> Self {
        Self {
            cdg,
            approach_levels,
            relevant,
            generator,
            genetic,
            executor,
            executor_time: Duration::ZERO,
        }
    }

    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<SearchOutcome> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let relevant_count = self.relevant.iter().filter(|&&r| r).count();
        let population_size = self.genetic.population_size;

        if relevant_count == 0 {
            info!("no relevant targets, skipping search");
            return Ok(SearchOutcome::without_targets(self.relevant, started_at));
        }

        let mut parents: Vec<TestCase> = (0..population_size)
            .map(|_| self.generator.random_test_case(rng))
            .collect();
        self.execute(&mut parents)?;

        let mut archive = Archive::new(self.cdg.edge_count());
        archive.update(&parents, &self.relevant);
        let mut active = active_targets(&parents, &self.relevant, &archive);
        for front in preference_sorting(&mut parents, &active, population_size) {
            subvector_distance(&mut parents, &front, &active);
        }

        let mut generations = vec![GenerationStats {
            generation: 0,
            covered: archive.covered_count(&self.relevant),
            active_targets: active.len(),
        }];
        let mut termination = Termination::BudgetExhausted;
        let mut iterations = 0;

        for generation in 0..self.genetic.search_budget {
            let covered = archive.covered_count(&self.relevant);
            info!(
                generation,
                covered,
                relevant = relevant_count,
                active = active.len(),
                "search progress"
            );
            if archive.is_complete(&self.relevant) {
                termination = Termination::Covered { generation };
                break;
            }
            iterations += 1;

            let mut offspring = generate_offspring(&parents, self.generator, &self.genetic, rng)?;
            self.execute(&mut offspring)?;
            let newly_covered = archive.update(&offspring, &self.relevant);

            let mut union = parents;
            union.extend(offspring);
            active = active_targets(&union, &self.relevant, &archive);
            let fronts = preference_sorting(&mut union, &active, population_size);
            let selected = environmental_selection(&mut union, &fronts, &active, population_size)?;
            parents = take_selected(union, &selected);

            debug!(generation, newly_covered, fronts = fronts.len(), "generation finished");
            generations.push(GenerationStats {
                generation: generation + 1,
                covered: archive.covered_count(&self.relevant),
                active_targets: active.len(),
            });
        }

        if termination == Termination::BudgetExhausted && archive.is_complete(&self.relevant) {
            termination = Termination::Covered { generation: iterations };
        }

        let outcome = SearchOutcome {
            termination,
            iterations,
            archive: archive.into_slots(),
            relevant: self.relevant,
            generations,
            total_time: clock.elapsed(),
            executor_time: self.executor_time,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            termination = %outcome.termination,
            iterations,
            covered = outcome.covered_count(),
            relevant = relevant_count,
            "search finished"
        );
        Ok(outcome)
    }

    /// Run `tests` as one executor batch and score them
    fn execute(&mut self, tests: &mut [TestCase]) -> Result<()> {
        let counts: Vec<usize> = tests.iter().map(TestCase::len).collect();
        let requests: Vec<CallRequest> = tests
            .iter()
            .flat_map(|t| t.calls().iter().map(CallRequest::from))
            .collect();

        let started = Instant::now();
        let results = self.executor.execute(&requests)?;
        self.executor_time += started.elapsed();

        let evaluator = FitnessEvaluator::new(self.cdg, self.approach_levels);
        for (test, results) in tests.iter_mut().zip(split_by_counts(results, &counts)?) {
            evaluator.evaluate(test, &results)?;
        }
        Ok(())
    }
}

fn take_selected(population: Vec<TestCase>, selected: &[usize]) -> Vec<TestCase> {
    let mut slots: Vec<Option<TestCase>> = population.into_iter().map(Some).collect();
    selected.iter().filter_map(|&i| slots[i].take()).collect()
}

impl SearchOutcome {
    /// Outcome of a contract with nothing to cover
    pub fn without_targets(relevant: Vec<bool>, started_at: DateTime<Utc>) -> Self {
        let archive = vec![None; relevant.len()];
        Self {
            termination: Termination::NoRelevantTargets,
            iterations: 0,
            relevant,
            archive,
            generations: Vec::new(),
            total_time: Duration::ZERO,
            executor_time: Duration::ZERO,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
