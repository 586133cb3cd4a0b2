//! Configuration I/O (YAML loading)
//!
//! Schema v1: a preset name plus optional per-section overrides. A section
//! given in YAML replaces the preset's section; omitted fields inside it
//! fall back to the section defaults.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::search_config::{GeneticConfig, SearchConfig, SequenceConfig, ValueConfig};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(default)]
    pub preset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Section overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<SearchOverrides>,
}

/// Section overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SearchOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genetic: Option<GeneticConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<SequenceConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<ValueConfig>,
}

impl SearchConfigFileV1 {
    /// Resolve the file into a validated configuration
    pub fn resolve(self) -> ConfigResult<SearchConfig> {
        let version = self.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match self.preset {
            Some(name) => name.parse::<Preset>()?,
            None => Preset::default(),
        };
        let mut config = SearchConfig::preset(preset);
        config.seed = self.seed;

        if let Some(overrides) = self.overrides {
            if let Some(genetic) = overrides.genetic {
                config.genetic = genetic;
            }
            if let Some(sequence) = overrides.sequence {
                config.sequence = sequence;
            }
            if let Some(values) = overrides.values {
                config.values = values;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl SearchConfig {
    /// Parse a v1 YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<SearchConfig> {
        let file: SearchConfigFileV1 = serde_yaml::from_str(content)?;
        file.resolve()
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<SearchConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = SearchConfigFileV1 {
            version: Some(1),
            preset: Some(self.preset.to_string()),
            seed: self.seed,
            overrides: Some(SearchOverrides {
                genetic: Some(self.genetic.clone()),
                sequence: Some(self.sequence.clone()),
                values: Some(self.values.clone()),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let config = SearchConfig::preset(Preset::Quick).population_size(8).seed(3);

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: quick"));
        assert!(yaml.contains("population_size: 8"));

        let parsed = SearchConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
preset: quick
overrides:
  genetic:
    population_size: 4
    search_budget: 10
  values:
    max_wei: 0
    ignore_functions: ["owner()"]
    deploying_accounts: ["0x0202020202020202020202020202020202020202"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = SearchConfig::from_yaml_file(temp_file.path()).unwrap();
        assert_eq!(config.preset, Preset::Quick);
        assert_eq!(config.genetic.population_size, 4);
        assert_eq!(config.genetic.search_budget, 10);
        // Omitted fields inside a section use section defaults
        assert_eq!(config.genetic.tournament_size, 2);
        assert_eq!(config.values.max_wei, 0);
        assert_eq!(config.values.ignore_functions, vec!["owner()".to_string()]);
        assert_eq!(config.values.deploying_accounts, vec![Address::repeat_byte(2)]);
        // Sections not overridden keep the preset values
        assert_eq!(config.sequence.max_method_calls, 5);
    }

    #[test]
    fn test_missing_version() {
        let err = SearchConfig::from_yaml_str("preset: quick\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));
    }

    #[test]
    fn test_unsupported_version() {
        let err = SearchConfig::from_yaml_str("version: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_unknown_preset() {
        let err = SearchConfig::from_yaml_str("version: 1\npreset: turbo\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SearchConfig::from_yaml_str("version: 1\ngenerations: 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let yaml = "version: 1\noverrides:\n  genetic:\n    population_size: 1\n";
        assert!(matches!(
            SearchConfig::from_yaml_str(yaml),
            Err(ConfigError::Range { .. })
        ));
    }
}
