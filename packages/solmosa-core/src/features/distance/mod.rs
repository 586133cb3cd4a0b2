//! Distance model
//!
//! Approach levels between CDG edges (computed once per contract) and the
//! per-test fitness: branch distance where a branch was reached, approach
//! level where it was not.

pub mod domain;
pub mod infrastructure;

pub use domain::ApproachLevelMatrix;
pub use infrastructure::errors::ScoringError;
pub use infrastructure::{branch_distance, normalise, FitnessEvaluator};
