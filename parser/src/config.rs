//! Engine configuration.
//!
//! Controls which extra lines count as device error banners, how the
//! `exec` path reaches a device, and batch parallelism.
//!
//! # Example YAML
//!
//! ```yaml
//! error_banners:
//!   - "^PIM not enabled"
//! source:
//!   program: ssh
//!   args: [r1.lab]
//!   timeout_ms: 5000
//! jobs: 4
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::ProcessSourceConfig;

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configured error banner is not a valid regular expression.
    #[error("invalid error banner pattern: {0}")]
    Banner(#[source] regex::Error),
}

/// Top-level engine configuration.
///
/// Every field is optional in YAML; an empty document yields the defaults.
///
/// # Examples
///
/// ```
/// use pim_show_parser::EngineConfig;
///
/// let config = EngineConfig::from_yaml_str("jobs: 2\n").unwrap();
/// assert_eq!(config.jobs, Some(2));
/// assert!(config.error_banners.is_empty());
/// assert!(config.source.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Regex patterns recognized as error banners on top of the defaults.
    #[serde(default)]
    pub error_banners: Vec<String>,
    /// External program used by `exec` to obtain live output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ProcessSourceConfig>,
    /// Worker threads for batch parsing; `None` uses all cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl EngineConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Parses configuration from YAML text. Blank text yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShowParser;

    fn sample_yaml() -> &'static str {
        r#"
error_banners:
  - "^PIM not enabled"
source:
  program: ssh
  args: [r1.lab, -T]
  timeout_ms: 2500
jobs: 8
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config = EngineConfig::from_yaml_str(sample_yaml()).unwrap();
        assert_eq!(config.error_banners, vec!["^PIM not enabled"]);
        let source = config.source.unwrap();
        assert_eq!(source.program, "ssh");
        assert_eq!(source.args, vec!["r1.lab", "-T"]);
        assert_eq!(source.timeout_ms, 2500);
        assert_eq!(config.jobs, Some(8));
    }

    #[test]
    fn test_blank_yaml_is_default() {
        assert_eq!(EngineConfig::from_yaml_str("\n").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_unknown_shape_is_yaml_error() {
        let err = EngineConfig::from_yaml_str("jobs: many\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_invalid_banner_is_rejected_by_parser() {
        let config = EngineConfig {
            error_banners: vec!["(unclosed".to_string()],
            ..EngineConfig::default()
        };
        assert!(matches!(
            ShowParser::with_config(&config),
            Err(ConfigError::Banner(_))
        ));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pim-show.yml");

        let original = EngineConfig::from_yaml_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        assert_eq!(EngineConfig::load(&path).unwrap(), original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
