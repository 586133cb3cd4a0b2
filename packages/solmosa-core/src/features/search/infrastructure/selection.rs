//! Environmental and tournament selection

use super::errors::SearchError;
use super::preference_sorting::subvector_distance;
use crate::features::genotype::TestCase;
use rand::seq::index::sample;
use rand::Rng;

/// Pick exactly `population_size` survivors, whole fronts first
///
/// The front that does not fit is cut by ascending subvector distance.
pub fn environmental_selection(
    tests: &mut [TestCase],
    fronts: &[Vec<usize>],
    active: &[usize],
    population_size: usize,
) -> Result<Vec<usize>, SearchError> {
    let mut selected = Vec::with_capacity(population_size);

    for front in fronts {
        if selected.len() == population_size {
            break;
        }
        subvector_distance(tests, front, active);
        if selected.len() + front.len() <= population_size {
            selected.extend_from_slice(front);
            continue;
        }
        let mut boundary = front.clone();
        boundary.sort_by_key(|&i| tests[i].subvector_distance);
        boundary.truncate(population_size - selected.len());
        selected.extend(boundary);
    }

    if selected.len() != population_size {
        return Err(SearchError::PopulationSize {
            expected: population_size,
            actual: selected.len(),
        });
    }
    Ok(selected)
}

/// Index of the tournament winner: lowest rank, then lowest subvector distance
pub fn tournament_selection<R: Rng + ?Sized>(
    tests: &[TestCase],
    tournament_size: usize,
    rng: &mut R,
) -> Result<usize, SearchError> {
    if tests.is_empty() {
        return Err(SearchError::EmptyPopulation);
    }
    let size = tournament_size.clamp(1, tests.len());
    sample(rng, tests.len(), size)
        .into_iter()
        .min_by_key(|&i| (tests[i].rank, tests[i].subvector_distance))
        .ok_or(SearchError::EmptyPopulation)
}
