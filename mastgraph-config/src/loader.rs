//! Configuration loading utilities

use crate::Config;
use mastgraph_common::Result as MastGraphResult;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for mastgraph_common::MastGraphError {
    fn from(err: ConfigError) -> Self {
        mastgraph_common::MastGraphError::config(err.to_string())
    }
}

fn parse_env<T>(var: &str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!("Loading configuration from {}", path.as_ref().display());
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Checks `MASTGRAPH_CONFIG_PATH`, then `config.yaml`/`config.yml` in the
    /// working directory, and falls back to built-in defaults with
    /// environment overrides applied.
    pub fn load() -> MastGraphResult<Config> {
        let config = if let Ok(config_path) = env::var("MASTGRAPH_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)
                .map_err(mastgraph_common::MastGraphError::from)?;
            config
                .validate_all()
                .map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MastGraphResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // Archive configuration overrides
        if let Ok(url) = env::var("MAST_BASE_URL") {
            config.archive.base_url = url;
        }

        if let Ok(token) = env::var("MAST_AUTH_TOKEN") {
            config.archive.auth_token = Some(token);
        }

        if let Ok(timeout) = env::var("MAST_TIMEOUT") {
            config.archive.timeout_seconds = parse_env("MAST_TIMEOUT", timeout)?;
        }

        if let Ok(retries) = env::var("MAST_MAX_RETRIES") {
            config.archive.max_retries = parse_env("MAST_MAX_RETRIES", retries)?;
        }

        if let Ok(rate) = env::var("MAST_RATE_LIMIT") {
            config.archive.rate_limit_per_sec = parse_env("MAST_RATE_LIMIT", rate)?;
        }

        if let Ok(cap) = env::var("MAST_MAX_RECORDS") {
            config.archive.max_records = Some(parse_env("MAST_MAX_RECORDS", cap)?);
        }

        // Chart configuration overrides
        if let Ok(width) = env::var("GRAPH_WIDTH") {
            config.graph.width = parse_env("GRAPH_WIDTH", width)?;
        }

        if let Ok(height) = env::var("GRAPH_HEIGHT") {
            config.graph.height = parse_env("GRAPH_HEIGHT", height)?;
        }

        if let Ok(bg_color) = env::var("GRAPH_BACKGROUND_COLOR") {
            config.graph.background_color = bg_color;
        }

        if let Ok(font_family) = env::var("GRAPH_FONT_FAMILY") {
            config.graph.font_family = font_family;
        }

        if let Ok(font_size) = env::var("GRAPH_FONT_SIZE") {
            config.graph.font_size = parse_env("GRAPH_FONT_SIZE", font_size)?;
        }

        // Logging configuration overrides
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(file) = env::var("LOG_FILE") {
            config.logging.file = Some(file);
        }

        if let Ok(json) = env::var("LOG_JSON") {
            config.logging.json_format = parse_env("LOG_JSON", json)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Create a temporary YAML config file for testing
    fn create_test_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn clear_override_vars() {
        for var in [
            "MAST_BASE_URL",
            "MAST_AUTH_TOKEN",
            "MAST_TIMEOUT",
            "MAST_MAX_RETRIES",
            "MAST_RATE_LIMIT",
            "MAST_MAX_RECORDS",
            "GRAPH_WIDTH",
            "GRAPH_HEIGHT",
            "GRAPH_BACKGROUND_COLOR",
            "GRAPH_FONT_FAMILY",
            "GRAPH_FONT_SIZE",
            "LOG_LEVEL",
            "LOG_FILE",
            "LOG_JSON",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_valid_yaml_config() {
        clear_override_vars();

        let yaml_content = "archive:\n  base_url: \"https://mast.example.com\"\n  timeout_seconds: 120\n  max_retries: 5\n  rate_limit_per_sec: 2\ngraph:\n  width: 1200\n  height: 900\n  background_color: \"#F0F0F0\"\n  font_family: \"DejaVu Sans\"\n  font_size: 14\nlogging:\n  level: \"debug\"\n";

        let temp_file = create_test_config_file(yaml_content);
        let config = ConfigLoader::load_config(temp_file.path()).expect("Failed to load config");

        assert_eq!(config.archive.base_url, "https://mast.example.com");
        assert_eq!(config.archive.timeout_seconds, 120);
        assert_eq!(config.graph.width, 1200);
        assert_eq!(config.graph.background_color, "#F0F0F0");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        clear_override_vars();

        let yaml_content = "archive:\n  max_records: 50000\n";
        let temp_file = create_test_config_file(yaml_content);
        let config = ConfigLoader::load_config(temp_file.path()).expect("Failed to load config");

        assert_eq!(config.archive.max_records, Some(50_000));
        assert_eq!(config.archive.base_url, "https://mast.stsci.edu");
        assert_eq!(config.graph.width, 800);
    }

    #[test]
    fn test_invalid_yaml() {
        let invalid_yaml = "archive:\n  base_url: [unclosed array";

        let temp_file = create_test_config_file(invalid_yaml);
        let result = ConfigLoader::load_config(temp_file.path());

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_error() {
        clear_override_vars();

        let invalid_config = "archive:\n  base_url: \"not_a_url\"\n";
        let temp_file = create_test_config_file(invalid_config);
        let result = ConfigLoader::load_config(temp_file.path());

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/config.yaml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_environment_variable_overrides() {
        clear_override_vars();

        env::set_var("MAST_BASE_URL", "https://env.example.com");
        env::set_var("MAST_TIMEOUT", "45");
        env::set_var("GRAPH_WIDTH", "1500");
        env::set_var("LOG_LEVEL", "warn");

        let mut config = Config::default();
        ConfigLoader::apply_env_overrides(&mut config).expect("overrides should apply");

        assert_eq!(config.archive.base_url, "https://env.example.com");
        assert_eq!(config.archive.timeout_seconds, 45);
        assert_eq!(config.graph.width, 1500);
        assert_eq!(config.logging.level, "warn");

        // Unparseable numeric override fails loudly
        env::set_var("MAST_TIMEOUT", "not_a_number");
        let result = ConfigLoader::apply_env_overrides(&mut Config::default());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::EnvParseError { .. }
        ));

        clear_override_vars();
    }

    #[test]
    fn test_config_error_converts_to_common_error() {
        let err = ConfigError::EnvParseError {
            var: "MAST_TIMEOUT".to_string(),
            source: "bad".parse::<u64>().unwrap_err().into(),
        };
        let converted: mastgraph_common::MastGraphError = err.into();
        assert!(converted.to_string().contains("MAST_TIMEOUT"));
    }
}
