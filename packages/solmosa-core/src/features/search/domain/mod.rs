//! Search domain: archive, targets and outcome

mod archive;
mod outcome;
mod targets;

pub use archive::Archive;
pub use outcome::{GenerationStats, SearchOutcome, Termination};
pub use targets::{active_targets, relevant_targets};
