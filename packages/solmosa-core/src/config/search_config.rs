//! Search parameter sections
//!
//! Each section owns one concern of the search and validates itself;
//! [`SearchConfig`] bundles them with the preset they were derived from.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::{check_probability, Validatable};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

// ============================================================================
// Genetic operators and budget
// ============================================================================

/// Population, budget and variation probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Individuals kept per generation (2..=10000)
    pub population_size: usize,

    /// Generations before the search gives up
    pub search_budget: usize,

    /// Probability of crossover instead of cloning the parents
    pub crossover_probability: f64,

    /// Probability of applying the remove-call mutation
    pub remove_probability: f64,

    /// Probability of applying the change-call mutation
    pub change_probability: f64,

    /// Probability of applying the insert-call mutation
    pub insert_probability: f64,

    /// Participants per tournament (>= 1)
    pub tournament_size: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self::for_preset(Preset::Standard)
    }
}

impl GeneticConfig {
    pub fn for_preset(preset: Preset) -> Self {
        let (population_size, search_budget) = match preset {
            Preset::Quick => (20, 20),
            Preset::Standard | Preset::Custom => (50, 100),
            Preset::Thorough => (100, 500),
        };
        Self {
            population_size,
            search_budget,
            crossover_probability: 0.75,
            remove_probability: 1.0 / 3.0,
            change_probability: 1.0 / 3.0,
            insert_probability: 1.0 / 3.0,
            tournament_size: 2,
        }
    }
}

impl Validatable for GeneticConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.population_size < 2 || self.population_size > 10_000 {
            return Err(ConfigError::range_with_hint(
                "population_size",
                self.population_size,
                2,
                10_000,
                "Crossover needs at least two parents",
            ));
        }
        check_probability("crossover_probability", self.crossover_probability)?;
        check_probability("remove_probability", self.remove_probability)?;
        check_probability("change_probability", self.change_probability)?;
        check_probability("insert_probability", self.insert_probability)?;
        if self.tournament_size == 0 {
            return Err(ConfigError::range_with_hint(
                "tournament_size",
                self.tournament_size,
                1,
                self.population_size,
                "A tournament needs at least one participant",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "genetic"
    }
}

// ============================================================================
// Call sequence shape
// ============================================================================

/// Length limits for call sequences and array inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Minimum non-constructor calls in a fresh test case
    pub min_method_calls: usize,

    /// Maximum non-constructor calls (also caps insert mutation)
    pub max_method_calls: usize,

    /// Minimum length of generated dynamic arrays
    pub min_array_length: usize,

    /// Maximum length of generated dynamic arrays
    pub max_array_length: usize,

    /// Add the `passTime` pseudo-method to the call pool
    pub pass_time: bool,

    /// Add the `passBlocks` pseudo-method to the call pool
    pub pass_blocks: bool,

    /// Seconds advanced by one `passTime` call
    pub pass_time_seconds: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self::for_preset(Preset::Standard)
    }
}

impl SequenceConfig {
    pub fn for_preset(preset: Preset) -> Self {
        let max_method_calls = match preset {
            Preset::Quick => 5,
            Preset::Standard | Preset::Custom => 10,
            Preset::Thorough => 15,
        };
        Self {
            min_method_calls: 1,
            max_method_calls,
            min_array_length: 1,
            max_array_length: 10,
            pass_time: false,
            pass_blocks: false,
            pass_time_seconds: 86_400,
        }
    }
}

impl Validatable for SequenceConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_method_calls == 0 {
            return Err(ConfigError::range_with_hint(
                "max_method_calls",
                self.max_method_calls,
                1,
                usize::MAX,
                "Test cases need at least one call besides the constructor",
            ));
        }
        if self.min_method_calls > self.max_method_calls {
            return Err(ConfigError::conflict(
                format!(
                    "min_method_calls ({}) exceeds max_method_calls ({})",
                    self.min_method_calls, self.max_method_calls
                ),
                "lower min_method_calls or raise max_method_calls",
            ));
        }
        if self.min_array_length > self.max_array_length {
            return Err(ConfigError::conflict(
                format!(
                    "min_array_length ({}) exceeds max_array_length ({})",
                    self.min_array_length, self.max_array_length
                ),
                "lower min_array_length or raise max_array_length",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "sequence"
    }
}

// ============================================================================
// Input values
// ============================================================================

/// Value sampling and method filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    /// Upper bound for wei sent to payable methods
    pub max_wei: u64,

    /// Allow the zero address as an address input
    pub zero_address: bool,

    /// Accounts requested from the executor
    pub max_accounts: usize,

    /// Constructor senders; empty deploys from any executor account
    pub deploying_accounts: Vec<Address>,

    /// Full signatures (`name(type,...)`) never called
    pub ignore_functions: Vec<String>,

    /// Skip compiler-generated getters of state variables
    pub ignore_state_variable_getters: bool,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            max_wei: 10_000_000_000_000_000_000,
            zero_address: true,
            max_accounts: 10,
            deploying_accounts: Vec::new(),
            ignore_functions: Vec::new(),
            ignore_state_variable_getters: true,
        }
    }
}

impl Validatable for ValueConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_accounts == 0 {
            return Err(ConfigError::range_with_hint(
                "max_accounts",
                self.max_accounts,
                1,
                usize::MAX,
                "Senders are drawn from the account list",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "values"
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Complete search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    pub preset: Preset,
    pub genetic: GeneticConfig,
    pub sequence: SequenceConfig,
    pub values: ValueConfig,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Complete defaults for a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            genetic: GeneticConfig::for_preset(preset),
            sequence: SequenceConfig::for_preset(preset),
            values: ValueConfig::default(),
            seed: None,
        }
    }

    pub fn population_size(mut self, size: usize) -> Self {
        self.genetic.population_size = size;
        self
    }

    pub fn search_budget(mut self, generations: usize) -> Self {
        self.genetic.search_budget = generations;
        self
    }

    pub fn max_wei(mut self, wei: u64) -> Self {
        self.values.max_wei = wei;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn genetic(mut self, f: impl FnOnce(GeneticConfig) -> GeneticConfig) -> Self {
        self.genetic = f(self.genetic);
        self
    }

    pub fn sequence(mut self, f: impl FnOnce(SequenceConfig) -> SequenceConfig) -> Self {
        self.sequence = f(self.sequence);
        self
    }

    pub fn values(mut self, f: impl FnOnce(ValueConfig) -> ValueConfig) -> Self {
        self.values = f(self.values);
        self
    }

    /// One-line summary for logs
    pub fn describe(&self) -> String {
        format!(
            "preset={} population={} budget={} calls={}..={} seed={}",
            self.preset,
            self.genetic.population_size,
            self.genetic.search_budget,
            self.sequence.min_method_calls,
            self.sequence.max_method_calls,
            self.seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "entropy".to_string())
        )
    }
}

impl Validatable for SearchConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.genetic.validate()?;
        self.sequence.validate()?;
        self.values.validate()?;
        if self.preset == Preset::Thorough && self.genetic.search_budget == 0 {
            return Err(ConfigError::conflict(
                "thorough preset with a zero search budget",
                "use the quick preset or set search_budget > 0",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [Preset::Quick, Preset::Standard, Preset::Thorough, Preset::Custom] {
            assert!(SearchConfig::preset(preset).validate().is_ok(), "{preset}");
        }
    }

    #[test]
    fn test_builder_overrides() {
        let config = SearchConfig::preset(Preset::Quick)
            .population_size(4)
            .search_budget(10)
            .max_wei(0)
            .seed(42);
        assert_eq!(config.genetic.population_size, 4);
        assert_eq!(config.genetic.search_budget, 10);
        assert_eq!(config.values.max_wei, 0);
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_population_too_small() {
        let config = SearchConfig::default().population_size(1);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "population_size"));
    }

    #[test]
    fn test_call_bounds_conflict() {
        let config = SearchConfig::default().sequence(|mut s| {
            s.min_method_calls = 8;
            s.max_method_calls = 3;
            s
        });
        assert!(matches!(config.validate(), Err(ConfigError::Conflict { .. })));
    }

    #[test]
    fn test_probability_out_of_range() {
        let config = SearchConfig::default().genetic(|mut g| {
            g.crossover_probability = 1.2;
            g
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_thorough_needs_budget() {
        let config = SearchConfig::preset(Preset::Thorough).search_budget(0);
        assert!(config.validate().is_err());
        assert!(SearchConfig::preset(Preset::Quick).search_budget(0).validate().is_ok());
    }

    #[test]
    fn test_describe_mentions_seed() {
        let text = SearchConfig::default().seed(7).describe();
        assert!(text.contains("seed=7"));
        assert!(SearchConfig::default().describe().contains("entropy"));
    }
}
