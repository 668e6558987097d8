//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::Period;

use super::types::EngineConfig;

/// Name of the configuration file inside a configuration directory.
pub const CONFIG_FILE_NAME: &str = "engine.yaml";

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// └── engine.yaml   # Column names, tolerance, window limits, report formats
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `engine.yaml` is missing (`ConfigNotFound`)
    /// - `engine.yaml` is not valid YAML for [`EngineConfig`] (`ConfigParseError`)
    /// - the window year limits are out of order or reach the last
    ///   representable year (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config_path = path.as_ref().join(CONFIG_FILE_NAME);
        let path_str = config_path.display().to_string();
        let config = Self::load_yaml::<EngineConfig>(&config_path)?;
        Self::validate(&config, &path_str)?;
        debug!(path = %config_path.display(), "Loaded engine configuration");
        Ok(Self { config })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        let config =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config, "<inline>")?;
        Ok(Self { config })
    }

    /// Checks limits that YAML types alone cannot express.
    fn validate(config: &EngineConfig, path: &str) -> EngineResult<()> {
        let window = &config.window;
        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.to_string(),
            message,
        };

        if window.max_year >= Period::MAX_YEAR {
            return Err(invalid(format!(
                "window.max_year {} must be below {}",
                window.max_year,
                Period::MAX_YEAR
            )));
        }
        if window.min_year < 0 || window.min_year > window.max_year {
            return Err(invalid(format!(
                "window.min_year {} must be between 0 and window.max_year {}",
                window.min_year, window.max_year
            )));
        }
        Ok(())
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
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
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().allocation_tolerance, Decimal::new(1, 6));
        assert_eq!(loader.config().columns.extract.cost_centre_code, "CCode");
    }

    #[test]
    fn test_shipped_configuration_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.into_config(), EngineConfig::default());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("cost_centre_code_width: [not, a, number]");

        match result {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert_eq!(path, "<inline>");
                assert!(!message.is_empty());
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_max_year_at_last_label_year_is_rejected() {
        let result = ConfigLoader::from_yaml_str("window:\n  max_year: 9999\n");

        match result {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert_eq!(path, "<inline>");
                assert!(message.contains("window.max_year 9999"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        let loader = ConfigLoader::from_yaml_str("window:\n  max_year: 9998\n").unwrap();
        assert_eq!(loader.config().window.max_year, 9998);
    }

    #[test]
    fn test_min_year_after_max_year_is_rejected() {
        let result = ConfigLoader::from_yaml_str("window:\n  min_year: 2500\n  max_year: 2400\n");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_inline_yaml_overrides_window() {
        let loader = ConfigLoader::from_yaml_str("window:\n  max_months: 6\n").unwrap();
        assert_eq!(loader.config().window.max_months, 6);
        assert_eq!(loader.config().window.min_year, 2000);
    }
}
