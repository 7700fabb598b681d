use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::files::WorkspaceFile;
use crate::openclaw::ConfigStore;
use crate::paths::PathResolver;
use crate::settings::AppSettings;

const NO_WORKSPACE_HINT: &str = "No workspace path in config (agents.defaults.workspace)";
const MISSING_DIR_HINT: &str = "Workspace directory does not exist";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("Path is outside the workspace directory")]
    PathTraversal,

    #[error("No workspace path configured")]
    NoWorkspace,

    #[error("failed to create workspace directory {}: {}", .path.display(), .source)]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },
}

impl WorkspaceError {
    /// Rejected before touching the filesystem.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidName(_) | Self::PathTraversal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceFileEntry {
    pub name: &'static str,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceListing {
    pub workspace_path: Option<PathBuf>,
    pub files: Vec<WorkspaceFileEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolve the workspace directory.
///
/// The `workspacePathOverride` setting wins over `agents.defaults.workspace`.
pub fn resolve_workspace_dir(
    settings: &AppSettings,
    config: &ConfigStore,
    resolver: &PathResolver,
) -> Option<PathBuf> {
    let override_dir = settings
        .workspace_path_override
        .as_deref()
        .map(str::trim)
        .filter(|dir| !dir.is_empty());

    match override_dir {
        Some(dir) => {
            let expanded = resolver.expand_home(dir);
            let absolute = std::path::absolute(&expanded).unwrap_or(expanded);
            Some(normalize(&absolute))
        }
        None => config.workspace_path(resolver),
    }
}

/// Access to the allow-listed files of one workspace directory.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    dir: Option<PathBuf>,
}

impl WorkspaceStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn resolve(settings: &AppSettings, config: &ConfigStore, resolver: &PathResolver) -> Self {
        Self::new(resolve_workspace_dir(settings, config, resolver))
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Existence of every allow-listed file. Never fails.
    pub fn list(&self) -> WorkspaceListing {
        let missing = || -> Vec<WorkspaceFileEntry> {
            WorkspaceFile::ALL
                .into_iter()
                .map(|file| WorkspaceFileEntry {
                    name: file.file_name(),
                    exists: false,
                })
                .collect()
        };

        let Some(dir) = self.dir.as_deref() else {
            return WorkspaceListing {
                workspace_path: None,
                files: missing(),
                error: Some(NO_WORKSPACE_HINT.to_string()),
            };
        };

        if !dir.is_dir() {
            return WorkspaceListing {
                workspace_path: Some(dir.to_path_buf()),
                files: missing(),
                error: Some(MISSING_DIR_HINT.to_string()),
            };
        }

        let files = WorkspaceFile::ALL
            .into_iter()
            .map(|file| WorkspaceFileEntry {
                name: file.file_name(),
                exists: dir.join(file.file_name()).exists(),
            })
            .collect();

        WorkspaceListing {
            workspace_path: Some(dir.to_path_buf()),
            files,
            error: None,
        }
    }

    /// Read a workspace file. A missing file reads as empty.
    pub fn read(&self, name: &str) -> Result<String, WorkspaceError> {
        let (_, path) = self.locate(name)?;

        match fs::read(&path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => Ok(content),
                Err(e) => {
                    debug!(
                        path = %path.display(),
                        valid_up_to = e.utf8_error().valid_up_to(),
                        "Workspace file is not valid UTF-8, replacing invalid bytes"
                    );
                    Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Workspace file missing, returning empty content");
                Ok(String::new())
            }
            Err(source) => Err(WorkspaceError::Read { path, source }),
        }
    }

    /// Overwrite a workspace file, creating the workspace directory if needed.
    pub fn write(&self, name: &str, content: &str) -> Result<(), WorkspaceError> {
        let (dir, path) = self.locate(name)?;

        if path.parent() != Some(dir) {
            warn!(path = %path.display(), "Refusing to write outside the workspace root");
            return Err(WorkspaceError::PathTraversal);
        }

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| WorkspaceError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        fs::write(&path, content).map_err(|source| WorkspaceError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = content.len(), "Workspace file saved");
        Ok(())
    }

    /// Validate `name` and build its path inside the workspace directory.
    fn locate(&self, name: &str) -> Result<(&Path, PathBuf), WorkspaceError> {
        let file = WorkspaceFile::from_name(name)
            .ok_or_else(|| WorkspaceError::InvalidName(name.to_string()))?;
        let dir = self.dir.as_deref().ok_or(WorkspaceError::NoWorkspace)?;

        let path = dir.join(file.file_name());
        if escapes(dir, &path) {
            warn!(file = name, "Workspace file path escapes the workspace directory");
            return Err(WorkspaceError::PathTraversal);
        }

        Ok((dir, path))
    }
}

/// True when `candidate`, taken relative to `base`, leaves `base`.
fn escapes(base: &Path, candidate: &Path) -> bool {
    let base = normalize(base);
    let candidate = normalize(candidate);
    match candidate.strip_prefix(&base) {
        Ok(relative) => {
            relative.as_os_str().is_empty()
                || relative
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
        }
        Err(_) => true,
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::openclaw::ConfigDocument;
    use crate::paths::ConfigRoot;

    const INVALID_NAMES: [&str; 6] = [
        "../escape.md",
        "sub/dir.md",
        "",
        "notes.md",
        "/etc/passwd",
        "..\\USER.md",
    ];

    fn workspace(temp: &TempDir) -> (WorkspaceStore, PathBuf) {
        let dir = temp.path().join("ws");
        (WorkspaceStore::new(Some(dir.clone())), dir)
    }

    #[test]
    fn test_round_trip_every_allowed_file() {
        let temp = TempDir::new().unwrap();
        let (store, _) = workspace(&temp);

        for file in WorkspaceFile::ALL {
            for content in ["", "# Soul\n\nBe kind.\n- one\n- two\n", "多字节 ✓"] {
                store.write(file.file_name(), content).unwrap();
                assert_eq!(store.read(file.file_name()).unwrap(), content);
            }
        }
    }

    #[test]
    fn test_write_creates_workspace_directory() {
        let temp = TempDir::new().unwrap();
        let (store, dir) = workspace(&temp);
        assert!(!dir.exists());

        store.write("USER.md", "hello").unwrap();

        assert_eq!(fs::read_to_string(dir.join("USER.md")).unwrap(), "hello");
    }

    #[test]
    fn test_write_overwrites_in_full() {
        let temp = TempDir::new().unwrap();
        let (store, _) = workspace(&temp);

        store.write("TOOLS.md", "a much longer first version").unwrap();
        store.write("TOOLS.md", "short").unwrap();

        assert_eq!(store.read("TOOLS.md").unwrap(), "short");
    }

    #[test]
    fn test_invalid_utf8_reads_with_replacement() {
        let temp = TempDir::new().unwrap();
        let (store, dir) = workspace(&temp);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("USER.md"), b"name: \xff\xfeclaw\n").unwrap();

        let content = store.read("USER.md").unwrap();

        assert_eq!(content, "name: \u{FFFD}\u{FFFD}claw\n");
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let (store, dir) = workspace(&temp);
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(store.read("BOOTSTRAP.md").unwrap(), "");
    }

    #[test]
    fn test_invalid_names_are_rejected_without_mutation() {
        let temp = TempDir::new().unwrap();
        let (store, dir) = workspace(&temp);

        for name in INVALID_NAMES {
            let read = store.read(name).unwrap_err();
            assert!(matches!(read, WorkspaceError::InvalidName(_)), "read {name:?}");
            assert!(read.is_validation());

            let write = store.write(name, "pwned").unwrap_err();
            assert!(matches!(write, WorkspaceError::InvalidName(_)), "write {name:?}");
        }

        assert!(!dir.exists());
        assert!(!temp.path().join("escape.md").exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_name_wins_over_missing_workspace() {
        let store = WorkspaceStore::new(None);
        assert!(matches!(
            store.read("../x.md"),
            Err(WorkspaceError::InvalidName(_))
        ));
        assert!(matches!(store.read("USER.md"), Err(WorkspaceError::NoWorkspace)));
        assert!(matches!(
            store.write("USER.md", "x"),
            Err(WorkspaceError::NoWorkspace)
        ));
    }

    #[test]
    fn test_read_directory_in_place_of_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let (store, dir) = workspace(&temp);
        fs::create_dir_all(dir.join("SOUL.md")).unwrap();

        let err = store.read("SOUL.md").unwrap_err();
        assert!(matches!(err, WorkspaceError::Read { .. }));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_list_without_workspace() {
        let listing = WorkspaceStore::new(None).list();

        assert_eq!(listing.workspace_path, None);
        assert_eq!(listing.files.len(), 6);
        assert!(listing.files.iter().all(|entry| !entry.exists));
        assert!(!listing.error.unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_directory() {
        let temp = TempDir::new().unwrap();
        let (store, dir) = workspace(&temp);

        let listing = store.list();

        assert_eq!(listing.workspace_path, Some(dir));
        assert!(listing.files.iter().all(|entry| !entry.exists));
        assert_eq!(listing.error.as_deref(), Some(MISSING_DIR_HINT));
    }

    #[test]
    fn test_list_checks_each_file() {
        let temp = TempDir::new().unwrap();
        let (store, _) = workspace(&temp);
        store.write("SOUL.md", "x").unwrap();
        store.write("AGENTS.md", "y").unwrap();

        let listing = store.list();

        assert!(listing.error.is_none());
        let names: Vec<_> = listing.files.iter().map(|entry| entry.name).collect();
        assert_eq!(
            names,
            ["USER.md", "IDENTITY.md", "SOUL.md", "AGENTS.md", "TOOLS.md", "BOOTSTRAP.md"]
        );
        let existing: Vec<_> = listing
            .files
            .iter()
            .filter(|entry| entry.exists)
            .map(|entry| entry.name)
            .collect();
        assert_eq!(existing, ["SOUL.md", "AGENTS.md"]);
    }

    #[test]
    fn test_listing_serializes_camel_case() {
        let value = serde_json::to_value(WorkspaceStore::new(None).list()).unwrap();
        assert!(value["workspacePath"].is_null());
        assert_eq!(value["files"][0], json!({ "name": "USER.md", "exists": false }));
    }

    #[test]
    fn test_escapes() {
        let base = Path::new("/ws");
        assert!(!escapes(base, Path::new("/ws/USER.md")));
        assert!(escapes(base, Path::new("/ws/../USER.md")));
        assert!(escapes(base, Path::new("/other/USER.md")));
        assert!(escapes(base, Path::new("/ws")));
        assert!(!escapes(Path::new("/ws/./a/.."), Path::new("/ws/USER.md")));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/..")), PathBuf::from(".."));
    }

    #[test]
    fn test_resolve_prefers_settings_override() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp.path(), None);
        let config = ConfigStore::new(ConfigRoot::new(temp.path().join(".openclaw")));
        config
            .write(
                &ConfigDocument::try_from(json!({
                    "agents": { "defaults": { "workspace": "~/from-config" } }
                }))
                .unwrap(),
            )
            .unwrap();

        let from_config = resolve_workspace_dir(&AppSettings::default(), &config, &resolver);
        assert_eq!(from_config, Some(temp.path().join("from-config")));

        let settings = AppSettings {
            workspace_path_override: Some(format!("{}/override/../ws", temp.path().display())),
            ..Default::default()
        };
        let from_override = resolve_workspace_dir(&settings, &config, &resolver);
        assert_eq!(from_override, Some(temp.path().join("ws")));
    }

    #[test]
    fn test_resolve_relative_override_is_absolute() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp.path(), None);
        let config = ConfigStore::new(ConfigRoot::new(temp.path().join(".openclaw")));
        let settings = AppSettings {
            workspace_path_override: Some("relative-ws".to_string()),
            ..Default::default()
        };

        let dir = resolve_workspace_dir(&settings, &config, &resolver).unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("relative-ws"));
    }

    #[test]
    fn test_resolve_blank_override_falls_back() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp.path(), None);
        let config = ConfigStore::new(ConfigRoot::new(temp.path().join(".openclaw")));
        let settings = AppSettings {
            workspace_path_override: Some("  ".to_string()),
            ..Default::default()
        };

        assert_eq!(resolve_workspace_dir(&settings, &config, &resolver), None);
    }
}
