pub mod crossover;
pub mod errors;
pub mod generator;
pub mod mutation;
pub mod numeric;
pub mod pool_scraper;

pub use crossover::crossover;
pub use generator::TestCaseGenerator;
pub use mutation::{mutate_string, Mutator};
pub use pool_scraper::scrape_pools;
