//! Configuration of the console server itself.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `QIANLICLAW__SECTION__KEY` environment variables.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::DEFAULT_BODY_LIMIT;
use crate::status::{DEFAULT_CLI, DEFAULT_HEALTH_TIMEOUT, HealthChecker};

pub const APP_NAME: &str = "qianliclaw";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3840;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to expand path {path:?}: {message}")]
    Expand { path: String, message: String },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body in bytes.
    pub body_limit_bytes: usize,
    /// Directory of a built console UI to serve next to the API.
    pub web_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
            web_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub timeout_secs: u64,
    /// Executable used when no CLI path is configured.
    pub command: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HEALTH_TIMEOUT.as_secs(),
            command: DEFAULT_CLI.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (may be absent) and the process environment.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        Self::load_with_env(path, &env_prefix())
    }

    pub fn load_with_env(path: &Path, env_prefix: &str) -> Result<Self, AppConfigError> {
        let built = Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("logging.level", "info")?
            .set_default("health.timeout_secs", DEFAULT_HEALTH_TIMEOUT.as_secs() as i64)?
            .set_default("health.command", DEFAULT_CLI)?
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(env_prefix).separator("__"))
            .build()?;

        Ok(built.try_deserialize()?)
    }

    /// The configured UI directory, shell-expanded.
    pub fn web_dir(&self) -> Result<Option<PathBuf>, AppConfigError> {
        self.server.web_dir.as_deref().map(expand_str_path).transpose()
    }

    pub fn health_checker(&self) -> HealthChecker {
        HealthChecker::new(
            self.health.command.clone(),
            Duration::from_secs(self.health.timeout_secs),
        )
    }

    /// Commented TOML with every default, for `config init`.
    pub fn default_toml(path: &Path) -> Result<String, AppConfigError> {
        let mut body = format!("# Configuration for {APP_NAME}\n# File: {}\n\n", path.display());
        body.push_str(&toml::to_string_pretty(&AppConfig::default())?);
        Ok(body)
    }
}

pub fn expand_str_path(text: &str) -> Result<PathBuf, AppConfigError> {
    let expanded = shellexpand::full(text).map_err(|e| AppConfigError::Expand {
        path: text.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// `$XDG_CONFIG_HOME/qianliclaw`, else the platform config dir.
pub fn default_config_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir).join(APP_NAME));
    }

    if let Some(dir) = dirs::config_dir() {
        return Some(dir.join(APP_NAME));
    }

    dirs::home_dir().map(|home| home.join(".config").join(APP_NAME))
}

pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
