//! Configuration loading: YAML file, environment overrides, validation.

use crate::schema::Config;
use std::env;
use std::path::{Path, PathBuf};
use termfreq_common::TermFreqError;
use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "TERMFREQ_CONFIG_PATH";

/// File names probed in the working directory, in order.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["termfreq.yaml", "termfreq.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file '{path}': {source}")]
    IoError {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Why the value did not parse
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for TermFreqError {
    fn from(err: ConfigError) -> Self {
        TermFreqError::config_with_source("Could not load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |name| env::var(name).ok())
    }

    /// Same as [`ConfigLoader::load_config`] with an injectable variable lookup.
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;
        Self::apply_overrides(&mut config, lookup)?;
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse YAML without overrides or validation. An empty document yields defaults.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Locate the configuration file to use, if any.
    ///
    /// An explicit path wins, then `TERMFREQ_CONFIG_PATH`, then the default
    /// file names in the working directory.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Load configuration from the resolved file, or defaults when there is none.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match Self::resolve_path(explicit) {
            Some(path) => Self::load_config(path),
            None => {
                debug!("No configuration file found, using defaults");
                let mut config = Config::default();
                Self::apply_overrides(&mut config, |name| env::var(name).ok())?;
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Apply `TERMFREQ_*` overrides on top of a parsed configuration
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TERMFREQ_SOURCE_URL") {
            config.source.base_url = url;
        }

        if let Some(level) = lookup("TERMFREQ_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(attempts) = lookup("TERMFREQ_MAX_ATTEMPTS") {
            config.retry.max_attempts =
                attempts
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::EnvParseError {
                        var: "TERMFREQ_MAX_ATTEMPTS".to_string(),
                        source: Box::new(e),
                    })?;
        }

        if let Some(language) = lookup("TERMFREQ_LANGUAGE") {
            config.language = language;
        }

        if let Some(dir) = lookup("TERMFREQ_OUTPUT_DIR") {
            config.export.output_dir = PathBuf::from(dir);
        }

        Ok(())
    }
}
