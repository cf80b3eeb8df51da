use std::path::Path;

use anyhow::{Result, anyhow};
use glob::Pattern;
use serde::{Deserialize, Deserializer, de::Error as _};

pub const DEFAULT_PATTERN: &str = "*.java";
pub const DEFAULT_SPACES: usize = 4;

/// Settings for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Glob matched against file base names when walking a directory. It is
    /// ignored for targets that are not directories.
    pub pattern: Pattern,

    /// Number of spaces each tab is replaced with.
    pub spaces: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: Pattern::new(DEFAULT_PATTERN).expect("default pattern must be valid"),
            spaces: DEFAULT_SPACES,
        }
    }
}

/// A set of optional settings, from a config file or the command line. Any
/// that are present replace the corresponding value in `Config`.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default, deserialize_with = "crate::serde_glob::deserialize_option")]
    pub pattern: Option<Pattern>,

    #[serde(default, deserialize_with = "deserialize_spaces")]
    pub spaces: Option<usize>,
}

/// Read `spaces` as a signed integer so negative values are rejected rather
/// than clamped.
fn deserialize_spaces<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(spaces) = Option::<i64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    usize::try_from(spaces).map(Some).map_err(|_| {
        D::Error::custom(format!(
            "spaces must be a non-negative integer, got {spaces}"
        ))
    })
}

impl Config {
    pub fn merge(self, partial: PartialConfig) -> Self {
        Self {
            pattern: partial.pattern.unwrap_or(self.pattern),
            spaces: partial.spaces.unwrap_or(self.spaces),
        }
    }
}

/// Read a JSON5 config file. We always read JSON5 so this works with JSONC
/// and JSON too.
pub fn read_config(path: &Path) -> Result<PartialConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Couldn't read config file ({path}): {e}", path = path.display()))?;

    serde_json5::from_str(&content).map_err(|e| {
        anyhow!(
            "Config deserialization error ({path}): {e}",
            path = path.display()
        )
    })
}

/// Build the config from the defaults, then the config file if one was
/// given, then the command line overrides.
pub fn load_config(config_file: Option<&Path>, overrides: PartialConfig) -> Result<Config> {
    let mut config = Config::default();
    if let Some(path) = config_file {
        log::debug!("Reading config from {}", path.display());
        config = config.merge(read_config(path)?);
    }
    Ok(config.merge(overrides))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pattern.as_str(), "*.java");
        assert_eq!(config.spaces, 4);
    }

    #[test]
    fn verify_sample_config() {
        let sample_config = include_str!("../sample_config.json5");
        let partial: PartialConfig = serde_json5::from_str(sample_config).unwrap();
        let config = Config::default().merge(partial);
        assert_eq!(config.pattern.as_str(), "*.java");
        assert_eq!(config.spaces, 4);
    }

    #[test]
    fn test_partial_config() {
        let partial: PartialConfig = serde_json5::from_str("{ spaces: 2 }").unwrap();
        let config = Config::default().merge(partial);
        assert_eq!(config.pattern.as_str(), "*.java");
        assert_eq!(config.spaces, 2);

        let partial: PartialConfig = serde_json5::from_str("{ spaces: 0 }").unwrap();
        assert_eq!(partial.spaces, Some(0));

        let partial: PartialConfig = serde_json5::from_str("{}").unwrap();
        assert_eq!(Config::default().merge(partial), Config::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(serde_json5::from_str::<PartialConfig>(r#"{ pattern: "[abc" }"#).is_err());
        assert!(serde_json5::from_str::<PartialConfig>("{ spaces: -1 }").is_err());
        assert!(serde_json5::from_str::<PartialConfig>("{ spaces: 'four' }").is_err());
        assert!(serde_json5::from_str::<PartialConfig>("{ tab_width: 2 }").is_err());
    }

    #[test]
    fn test_negative_spaces_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("negative.json5");
        std::fs::write(&path, "{ spaces: -1 }").unwrap();

        let err = load_config(Some(&path), PartialConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("negative.json5"));
        assert!(message.contains("Config deserialization error"));
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json5");

        // No config file at all.
        let config = load_config(None, PartialConfig::default()).unwrap();
        assert_eq!(config, Config::default());

        std::fs::write(&path, "// Comment.\n{ pattern: '*.h', spaces: 8, }\n").unwrap();
        let config = load_config(Some(&path), PartialConfig::default()).unwrap();
        assert_eq!(config.pattern.as_str(), "*.h");
        assert_eq!(config.spaces, 8);

        // Command line overrides win.
        let overrides = PartialConfig {
            pattern: None,
            spaces: Some(2),
        };
        let config = load_config(Some(&path), overrides).unwrap();
        assert_eq!(config.pattern.as_str(), "*.h");
        assert_eq!(config.spaces, 2);
    }

    #[test]
    fn test_load_explicit_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json5");

        let err = load_config(Some(&path), PartialConfig::default()).unwrap_err();
        assert!(err.to_string().contains("custom.json5"));

        std::fs::write(&path, "{ spaces: 'three' }").unwrap();
        let err = load_config(Some(&path), PartialConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Config deserialization error"));
    }
}
