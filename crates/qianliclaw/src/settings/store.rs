//! Settings persistence and partial updates.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const SETTINGS_DIR: &str = ".qianliclaw";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted console preferences. Every field is nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Directory used instead of the discovered OpenClaw config root
    pub config_root_override: Option<String>,
    /// Workspace directory used instead of `agents.defaults.workspace`
    pub workspace_path_override: Option<String>,
    /// Path of the `openclaw` executable for health checks
    pub openclaw_cli_path: Option<String>,
    /// Gateway URL shown by the UI
    pub gateway_url: Option<String>,
}

/// Partial settings update.
///
/// The outer `Option` records whether the field was present in the request,
/// the inner one carries the (nullable) value. Omitted fields keep their
/// previous value, present fields overwrite it, `null` included.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, deserialize_with = "present")]
    pub config_root_override: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub workspace_path_override: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub openclaw_cli_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub gateway_url: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl SettingsUpdate {
    /// Merge this update over `current`, field by field.
    pub fn apply(self, current: AppSettings) -> AppSettings {
        AppSettings {
            config_root_override: self
                .config_root_override
                .unwrap_or(current.config_root_override),
            workspace_path_override: self
                .workspace_path_override
                .unwrap_or(current.workspace_path_override),
            openclaw_cli_path: self.openclaw_cli_path.unwrap_or(current.openclaw_cli_path),
            gateway_url: self.gateway_url.unwrap_or(current.gateway_url),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to create settings directory {}: {}", .path.display(), .source)]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write settings file {}: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },
}

/// File-backed settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<home>/.qianliclaw/settings.json`.
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings. A missing or unreadable file yields empty settings.
    pub fn read(&self) -> AppSettings {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return AppSettings::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read settings, using defaults");
                return AppSettings::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Invalid settings file, using defaults");
                AppSettings::default()
            }
        }
    }

    /// Overwrite the settings file with `settings`.
    pub fn write(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Merge `update` over the stored settings and persist the result.
    pub fn update(&self, update: SettingsUpdate) -> Result<AppSettings, SettingsError> {
        let next = update.apply(self.read());
        debug!(?next, "Applying settings update");
        self.write(&next)?;
        Ok(next)
    }
}
