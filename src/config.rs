//! Configuration management for Playlist Sieve
//!
//! Settings come from four layers, later ones winning:
//! 1. Built-in defaults
//! 2. A TOML config file (`--config`, `./playlist-sieve.toml`, or the user
//!    config directory)
//! 3. Environment variables, including those loaded from `.env`
//! 4. Command-line flags, applied by the CLI handlers
//!
//! Every section is optional, as is every key inside a section.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, CoordinatorConfig, OutputConfig, ProbeConfig, WorkerConfig};
use crate::constants::{env, files, logging, playlist};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the master playlist comes from
    pub source: SourceConfig,
    /// Shared HTTP client settings
    pub client: ClientConfig,
    /// Per-probe budgets
    pub probe: ProbeConfig,
    /// Worker pool settings
    pub dispatch: WorkerConfig,
    /// Output playlist settings
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Master playlist location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub master_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            master_url: playlist::DEFAULT_MASTER_URL.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicitly requested file does
    /// not exist, or a read/parse error for a file that does
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound { path }),
            Some(path) => Some(path),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Find a configuration file in the standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Per-user config file location, if the platform has one
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::MASTER_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Master URL overridden by {}", env::MASTER_URL);
            self.source.master_url = url.trim().to_string();
        }
        if let Some(path) = lookup(env::OUTPUT_PATH).filter(|v| !v.trim().is_empty()) {
            debug!("Output path overridden by {}", env::OUTPUT_PATH);
            self.output.path = PathBuf::from(path.trim());
        }
    }

    /// Check values that would make a run meaningless
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field
    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.source.master_url;
        match url::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(_) => return Err(invalid("source.master_url", url, "must be an http(s) URL")),
            Err(e) => return Err(invalid("source.master_url", url, &e.to_string())),
        }

        if self.probe.timeout.is_zero() {
            return Err(invalid("probe.timeout", "0s", "must be greater than zero"));
        }
        if self.client.master_timeout.is_zero() {
            return Err(invalid(
                "client.master_timeout",
                "0s",
                "must be greater than zero",
            ));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(invalid("output.path", "", "must not be empty"));
        }
        if self.dispatch.verdict_buffer_size == 0 {
            return Err(invalid(
                "dispatch.verdict_buffer_size",
                "0",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the session configuration for the coordinator
    pub fn to_coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            master_url: self.source.master_url.clone(),
            probe: self.probe.clone(),
            workers: self.dispatch.clone(),
            output: self.output.clone(),
        }
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
