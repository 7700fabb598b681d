use std::path::PathBuf;

use crate::openclaw::ConfigStore;
use crate::paths::PathResolver;
use crate::settings::{AppSettings, SettingsStore};
use crate::workspace::WorkspaceStore;

/// Stores resolved for one request or command.
///
/// Settings and the config root are read once up front; the config file and
/// workspace files are read on demand.
#[derive(Debug, Clone)]
pub struct ConsoleContext {
    resolver: PathResolver,
    settings: AppSettings,
    config: ConfigStore,
}

impl ConsoleContext {
    pub fn new(resolver: PathResolver, settings: AppSettings, config_root_override: Option<&str>) -> Self {
        let config = ConfigStore::new(resolver.config_root(config_root_override));
        Self {
            resolver,
            settings,
            config,
        }
    }

    /// Resolve from the settings file, with the override taken from the saved settings.
    pub fn load(resolver: PathResolver, settings: &SettingsStore) -> Self {
        let settings = settings.read();
        let config_root_override = settings.config_root_override.clone();
        Self::new(resolver, settings, config_root_override.as_deref())
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn workspace_dir(&self) -> Option<PathBuf> {
        self.workspace().dir().map(PathBuf::from)
    }

    pub fn workspace(&self) -> WorkspaceStore {
        WorkspaceStore::resolve(&self.settings, &self.config, &self.resolver)
    }
}
