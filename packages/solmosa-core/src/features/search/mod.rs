//! DynaMOSA search engine
//!
//! Generational loop over method-call sequences: preference sorting on
//! the targets that are reached but not yet covered, an archive of the
//! shortest covering test per target, tournament selection and
//! crossover/mutation.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ContractUnderTest, GenerateTestsUseCase};
pub use domain::{active_targets, relevant_targets, Archive, GenerationStats, SearchOutcome, Termination};
pub use infrastructure::errors::SearchError;
pub use infrastructure::{
    environmental_selection, fast_non_dominated_sort, generate_offspring, preference_sorting,
    subvector_distance, tournament_selection, DynaMosa,
};
