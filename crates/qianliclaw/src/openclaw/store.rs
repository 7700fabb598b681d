//! Read/write of the OpenClaw config file.
//!
//! Reads accept JSON5 (comments, trailing commas, unquoted keys). Writes are
//! strict JSON with two-space indentation, so JSON5-only syntax does not
//! survive a save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::document::{ConfigDocument, NotAnObject};
use crate::paths::{ConfigRoot, PathResolver};

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("failed to create config directory {}: {}", .path.display(), .source)]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write config file {}: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
enum LoadError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },

    #[error("{0}")]
    Parse(#[from] json5::Error),

    #[error(transparent)]
    Shape(#[from] NotAnObject),
}

/// Result of reading the config.
///
/// The path is always present so callers can point at a broken file.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub config: ConfigDocument,
    pub config_path: PathBuf,
    pub error: Option<String>,
}

impl ConfigSnapshot {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Config file access bound to one resolved config root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: ConfigRoot,
}

impl ConfigStore {
    pub fn new(root: ConfigRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.file_path()
    }

    /// Read and parse the config. A missing file is an empty config.
    pub fn read(&self) -> ConfigSnapshot {
        let config_path = self.path();
        match load(&config_path) {
            Ok(config) => ConfigSnapshot {
                config: config.unwrap_or_default(),
                config_path,
                error: None,
            },
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "Failed to load config");
                ConfigSnapshot {
                    config: ConfigDocument::new(),
                    config_path,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Overwrite the config file with `config`.
    pub fn write(&self, config: &ConfigDocument) -> Result<(), ConfigStoreError> {
        let config_path = self.path();
        let dir = self.root.dir();
        fs::create_dir_all(dir).map_err(|source| ConfigStoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&config_path, content).map_err(|source| ConfigStoreError::Write {
            path: config_path.clone(),
            source,
        })?;

        info!(path = %config_path.display(), keys = config.as_map().len(), "Config saved");
        Ok(())
    }

    /// Workspace directory named by `agents.defaults.workspace`, tilde-expanded.
    pub fn workspace_path(&self, resolver: &PathResolver) -> Option<PathBuf> {
        let snapshot = self.read();
        snapshot
            .config
            .default_workspace()
            .map(|workspace| resolver.expand_home(workspace))
    }
}

fn load(path: &Path) -> Result<Option<ConfigDocument>, LoadError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Config file not found, using empty config");
            return Ok(None);
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // Files saved by the console are strict JSON, and serde_json keeps integers
    // outside the i64 range that json5 refuses.
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => json5::from_str(&raw)?,
    };
    Ok(Some(ConfigDocument::try_from(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn store_in(dir: &Path) -> ConfigStore {
        ConfigStore::new(ConfigRoot::new(dir.join(".openclaw")))
    }

    fn doc(value: Value) -> ConfigDocument {
        ConfigDocument::try_from(value).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_without_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());

        let snapshot = store.read();

        assert!(snapshot.is_ok());
        assert!(snapshot.config.is_empty());
        assert_eq!(snapshot.config_path, temp.path().join(".openclaw/openclaw.json"));
    }

    #[test]
    fn test_reads_json5() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        fs::create_dir_all(store.root().dir()).unwrap();
        fs::write(
            store.path(),
            r#"{
                // gateway settings
                gateway: { port: 18789, },
                agents: { defaults: { workspace: '~/clawd' } },
            }"#,
        )
        .unwrap();

        let snapshot = store.read();

        assert!(snapshot.is_ok(), "{:?}", snapshot.error);
        assert_eq!(snapshot.config.get("gateway"), Some(&json!({ "port": 18789 })));
        assert_eq!(snapshot.config.default_workspace(), Some("~/clawd"));
    }

    #[test]
    fn test_parse_error_keeps_path() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        fs::create_dir_all(store.root().dir()).unwrap();
        fs::write(store.path(), "{ gateway: ").unwrap();

        let snapshot = store.read();

        assert!(!snapshot.is_ok());
        assert!(!snapshot.error.unwrap().is_empty());
        assert!(snapshot.config.is_empty());
        assert_eq!(snapshot.config_path, store.path());
    }

    #[test]
    fn test_non_object_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        fs::create_dir_all(store.root().dir()).unwrap();
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        let snapshot = store.read();

        assert_eq!(
            snapshot.error.as_deref(),
            Some("config must be a JSON object, got an array")
        );
    }

    #[test]
    fn test_write_creates_directory_and_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        let config = doc(json!({
            "gateway": { "port": 18789, "reload": true },
            "agents": { "list": [{ "id": "main" }], "defaults": { "workspace": "~/clawd" } },
            "channels": null,
            "ratio": 0.5,
            "name": "claw"
        }));

        store.write(&config).unwrap();
        let snapshot = store.read();

        assert!(snapshot.is_ok());
        assert_eq!(snapshot.config, config);
    }

    #[test]
    fn test_write_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        let config = doc(json!({ "session": { "dmScope": "main" } }));

        store.write(&config).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();
        store.write(&config).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.read().config, config);
    }

    #[test]
    fn test_write_uses_strict_pretty_json() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        fs::create_dir_all(store.root().dir()).unwrap();
        fs::write(store.path(), "{ // note\n a: 1, }").unwrap();

        let config = store.read().config;
        store.write(&config).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_round_trips_integers_outside_i64() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        let config = doc(json!({
            "big": u64::MAX,
            "neg": i64::MIN,
            "f": 1.5e300,
            "gateway": { "port": 18789 }
        }));

        store.write(&config).unwrap();
        let snapshot = store.read();

        assert!(snapshot.is_ok(), "{:?}", snapshot.error);
        assert_eq!(snapshot.config, config);
    }

    #[test]
    fn test_reads_integer_literal_wider_than_u64() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        fs::create_dir_all(store.root().dir()).unwrap();
        fs::write(
            store.path(),
            r#"{"counter": 100000000000000000000, "agents": {"defaults": {"workspace": "~/ws"}}}"#,
        )
        .unwrap();

        let snapshot = store.read();

        assert!(snapshot.is_ok(), "{:?}", snapshot.error);
        assert_eq!(snapshot.config.get("counter"), Some(&json!(1e20)));
        assert_eq!(snapshot.config.default_workspace(), Some("~/ws"));
    }

    #[test]
    fn test_write_preserves_key_order() {
        let temp = TempDir::new().unwrap();
        let store = store_in(temp.path());
        let config = doc(json!({ "zeta": 1, "alpha": 2 }));

        store.write(&config).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.find("zeta").unwrap() < raw.find("alpha").unwrap());
    }

    #[test]
    fn test_workspace_path_is_expanded() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp.path(), None);
        let store = store_in(temp.path());
        store
            .write(&doc(json!({ "agents": { "defaults": { "workspace": " ~/clawd " } } })))
            .unwrap();

        assert_eq!(store.workspace_path(&resolver), Some(temp.path().join("clawd")));
    }

    #[test]
    fn test_workspace_path_absent() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp.path(), None);
        let store = store_in(temp.path());

        assert_eq!(store.workspace_path(&resolver), None);

        store
            .write(&doc(json!({ "agents": { "defaults": { "workspace": "" } } })))
            .unwrap();
        assert_eq!(store.workspace_path(&resolver), None);
    }
}
