//! Offspring assembly

use super::errors::SearchError;
use super::selection::tournament_selection;
use crate::config::GeneticConfig;
use crate::features::genotype::{crossover, Mutator, TestCase, TestCaseGenerator};
use rand::Rng;
use tracing::warn;

/// Rejected draws in a row before parent copies and duplicates are accepted
const MAX_STALLED_DRAWS: usize = 1_000;

/// Breed `population_size` fresh, unscored children from `parents`
///
/// A pair whose children both reproduce their parents is dropped, as is a
/// child whose calls match one already bred, so offspring are distinct
/// wherever variation allows it.
pub fn generate_offspring<R: Rng + ?Sized>(
    parents: &[TestCase],
    generator: &TestCaseGenerator,
    genetic: &GeneticConfig,
    rng: &mut R,
) -> Result<Vec<TestCase>, SearchError> {
    let population_size = genetic.population_size;
    let mutator = Mutator::new(generator, genetic);
    let mut offspring: Vec<TestCase> = Vec::with_capacity(population_size + 1);
    let mut stalled = 0;

    while offspring.len() < population_size {
        let first = &parents[tournament_selection(parents, genetic.tournament_size, rng)?];
        let second = &parents[tournament_selection(parents, genetic.tournament_size, rng)?];

        let (mut child_first, mut child_second) = if rng.gen_bool(genetic.crossover_probability) {
            crossover(first, second, rng)
        } else {
            (
                TestCase::new(first.calls().to_vec()),
                TestCase::new(second.calls().to_vec()),
            )
        };
        mutator.mutate(&mut child_first, rng);
        mutator.mutate(&mut child_second, rng);

        let accept_copies = stalled >= MAX_STALLED_DRAWS;
        if !accept_copies && child_first.same_calls(first) && child_second.same_calls(second) {
            note_stall(&mut stalled);
            continue;
        }

        for child in [child_first, child_second] {
            if !offspring.iter().any(|bred| bred.same_calls(&child)) {
                stalled = 0;
            } else if !accept_copies {
                note_stall(&mut stalled);
                continue;
            }
            offspring.push(child);
        }
    }

    offspring.truncate(population_size);
    Ok(offspring)
}

fn note_stall(stalled: &mut usize) {
    *stalled += 1;
    if *stalled == MAX_STALLED_DRAWS {
        warn!(stalled = *stalled, "variation keeps reproducing existing tests, accepting copies");
    }
}
