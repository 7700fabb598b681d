//! Config root resolution for the OpenClaw runtime.
//!
//! The config root is resolved fresh for every request. Priority, first match wins:
//! 1. an explicit override (the `configRootOverride` setting)
//! 2. the `OPENCLAW_CONFIG_HOME` environment variable
//! 3. `~/.openclaw` when it already holds `openclaw.json`
//! 4. `~/.moltbot` when it already holds `moltbot.json` (legacy installs)
//! 5. `~/.openclaw`

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable naming the config home.
pub const CONFIG_HOME_ENV: &str = "OPENCLAW_CONFIG_HOME";

const PRIMARY_DIR: &str = ".openclaw";
const PRIMARY_FILE: &str = "openclaw.json";
const LEGACY_DIR: &str = ".moltbot";
const LEGACY_FILE: &str = "moltbot.json";

/// A resolved config root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    dir: PathBuf,
}

impl ConfigRoot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Config file name associated with this root.
    pub fn file_name(&self) -> &'static str {
        config_file_name(&self.dir)
    }

    /// Full path of the config file inside this root.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }
}

/// `moltbot.json` for a `.moltbot` root, `openclaw.json` for everything else.
pub fn config_file_name(root: &Path) -> &'static str {
    match root.file_name().and_then(|name| name.to_str()) {
        Some(LEGACY_DIR) => LEGACY_FILE,
        _ => PRIMARY_FILE,
    }
}

/// Resolves the config root and expands `~` against a fixed home directory.
///
/// The home directory and the environment override are captured once, so a
/// resolver can be built over a temp directory in tests.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: PathBuf,
    env_root: Option<String>,
}

impl PathResolver {
    pub fn new(home: impl Into<PathBuf>, env_root: Option<String>) -> Self {
        Self {
            home: home.into(),
            env_root: env_root.filter(|value| !value.is_empty()),
        }
    }

    /// Build a resolver from the process environment.
    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        Self::new(home, env::var(CONFIG_HOME_ENV).ok())
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Replace a leading `~`, `~/` or `~\` with the home directory.
    ///
    /// Any other path, relative ones included, is returned unchanged.
    pub fn expand_home(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~\\") {
            return self.home.join(rest);
        }
        let expanded = shellexpand::tilde_with_context(path, || self.home.to_str());
        PathBuf::from(expanded.into_owned())
    }

    /// Resolve the config root, honouring an optional override.
    pub fn config_root(&self, override_root: Option<&str>) -> ConfigRoot {
        if let Some(root) = override_root.map(str::trim).filter(|root| !root.is_empty()) {
            return ConfigRoot::new(self.expand_home(root));
        }

        if let Some(root) = self.env_root.as_deref() {
            return ConfigRoot::new(self.expand_home(root));
        }

        let primary = self.home.join(PRIMARY_DIR);
        if primary.join(PRIMARY_FILE).exists() {
            return ConfigRoot::new(primary);
        }

        let legacy = self.home.join(LEGACY_DIR);
        if legacy.join(LEGACY_FILE).exists() {
            debug!(root = %legacy.display(), "using legacy moltbot config root");
            return ConfigRoot::new(legacy);
        }

        ConfigRoot::new(primary)
    }
}
