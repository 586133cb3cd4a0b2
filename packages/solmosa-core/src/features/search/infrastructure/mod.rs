pub mod dynamosa;
pub mod errors;
pub mod offspring;
pub mod preference_sorting;
pub mod selection;

pub use dynamosa::DynaMosa;
pub use offspring::generate_offspring;
pub use preference_sorting::{dominates, fast_non_dominated_sort, preference_sorting, subvector_distance};
pub use selection::{environmental_selection, tournament_selection};
