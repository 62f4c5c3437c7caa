//! Client configuration
//!
//! Sources are layered, later ones winning:
//!
//! 1. built-in defaults
//! 2. `study-assistant.toml` (or the file given with `--config`), if present
//! 3. `STUDY_ASSISTANT__<SECTION>__<KEY>` environment variables, e.g.
//!    `STUDY_ASSISTANT__SERVER__BASE_URL=https://study.example.com`
//!
//! A `.env` file in the working directory is loaded before the environment
//! is read.

use crate::session::SelectionPolicy;
use crate::types::ClientError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "study-assistant.toml";

const ENV_PREFIX: &str = "STUDY_ASSISTANT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub sessions: SessionsConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Backend root, without a trailing `/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

// ============= Storage Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the stored token and profile.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".study-assistant/storage.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Session Configuration =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionsConfig {
    #[serde(default)]
    pub selection: SelectionPolicy,
}

/// Errors that can occur while loading or writing configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to render TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Failed to write configuration file: {0}")]
    Write(#[from] std::io::Error),

    #[error("Configuration file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl ClientConfig {
    /// Load configuration from `path` (optional) and the process environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process
    /// environment. `None` reads the real environment.
    pub fn load_with_env(
        path: impl AsRef<Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(env),
            )
            .build()?;

        let config: ClientConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            ConfigError::ValidationError(format!(
                "server.base_url {} (got '{}')",
                reason, self.server.base_url
            ))
        };
        let url = reqwest::Url::parse(self.server.base_url.trim())
            .map_err(|e| invalid(&format!("is not a valid URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("must start with http:// or https://"));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("must name a host"));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as a TOML document.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the default configuration to `path`.
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn write_default(path: impl AsRef<Path>, force: bool) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        let config = Self::default();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, config.to_toml()?)?;
        Ok(config)
    }
}
