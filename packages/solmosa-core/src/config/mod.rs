//! Search configuration
//!
//! Layered like the rest of the workspace: a [`Preset`] supplies complete
//! defaults, section structs carry their own validation, and a versioned
//! YAML schema applies overrides on top of the preset.

pub mod error;
pub mod io;
pub mod preset;
pub mod search_config;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use io::{SearchConfigFileV1, SearchOverrides};
pub use preset::Preset;
pub use search_config::{GeneticConfig, SearchConfig, SequenceConfig, ValueConfig};
pub use validation::Validatable;
