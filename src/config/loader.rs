//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and provides access to engine configuration.
///
/// The configuration file is a single YAML document:
/// ```text
/// schedule:
///   next_occurrence_horizon_days: 30
///   max_listed_dates: 3
/// gaps:
///   horizon_days: 14
/// missed:
///   staleness_days: 3
/// expiry:
///   expiring_soon_days: 2
/// labels:
///   weekdays: [Sun, Mon, Tue, Wed, Thu, Fri, Sat]
/// ```
///
/// # Example
///
/// ```no_run
/// use care_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/care_engine.yaml").unwrap();
/// println!("Gap horizon: {} days", loader.config().gaps.horizon_days);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if the file cannot be read
    /// - [`EngineError::ConfigParseError`] if it is not valid YAML for [`EngineConfig`]
    /// - [`EngineError::InvalidConfig`] if a value fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let loader = Self::from_yaml_str(&content, &path_str)?;
        debug!(path = %path_str, "Loaded engine configuration");
        Ok(loader)
    }

    /// Parses configuration from YAML text. `origin` names the source in errors.
    ///
    /// # Example
    ///
    /// ```
    /// use care_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str("missed:\n  staleness_days: 5\n", "inline")?;
    /// assert_eq!(loader.config().missed.staleness_days, 5);
    /// assert_eq!(loader.config().gaps.horizon_days, 14);
    /// # Ok::<(), care_engine::error::EngineError>(())
    /// ```
    pub fn from_yaml_str(content: &str, origin: &str) -> EngineResult<Self> {
        // An empty document deserializes as unit, not as a mapping.
        let config: EngineConfig = if content.trim().is_empty() {
            EngineConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?
        };

        config.validate()?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/care_engine.yaml"
    }

    #[test]
    fn test_load_shipped_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.schedule.next_occurrence_horizon_days, 30);
        assert_eq!(config.schedule.max_listed_dates, 3);
        assert_eq!(config.missed.staleness_days, 3);
        assert_eq!(config.labels.weekdays.len(), 7);
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/care_engine.yaml");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("care_engine.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "gaps:\n  horizon_days: 7\n";
        let loader = ConfigLoader::from_yaml_str(yaml, "inline").unwrap();

        assert_eq!(loader.config().gaps.horizon_days, 7);
        assert_eq!(loader.config().schedule.next_occurrence_horizon_days, 30);
        assert_eq!(loader.config().labels.daily, "daily");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let loader = ConfigLoader::from_yaml_str("   \n", "inline").unwrap();
        assert_eq!(loader.config(), &EngineConfig::default());
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("gaps: [unclosed", "broken.yaml");

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "broken.yaml");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("gaps:\n  horizon_days: soon\n", "inline");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = ConfigLoader::from_yaml_str("labels:\n  weekdays: [Sun, Mon]\n", "inline");
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_custom_labels_are_loaded() {
        let yaml = r#"
labels:
  weekdays: [日, 月, 火, 水, 木, 金, 土]
  daily: 毎日
  separator: "・"
"#;
        let loader = ConfigLoader::from_yaml_str(yaml, "inline").unwrap();
        let labels = &loader.config().labels;

        assert_eq!(labels.weekday(1), "月");
        assert_eq!(labels.daily, "毎日");
        assert_eq!(labels.separator, "・");
        assert_eq!(labels.unscheduled, "unscheduled");
    }
}
