pub mod approach_level;
pub mod branch_distance;
pub mod errors;
pub mod trace_replay;

pub use branch_distance::{branch_distance, normalise};
pub use trace_replay::FitnessEvaluator;
