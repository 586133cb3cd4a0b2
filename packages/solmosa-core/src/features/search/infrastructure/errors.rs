//! Search error types

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Environmental selection produced the wrong number of parents
    #[error("selected {actual} parents for a population of {expected}")]
    PopulationSize { expected: usize, actual: usize },

    #[error("cannot select parents from an empty population")]
    EmptyPopulation,
}
