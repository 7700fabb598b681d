//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::context::ConsoleContext;
use crate::paths::PathResolver;
use crate::settings::SettingsStore;
use crate::status::HealthChecker;

#[derive(Clone)]
pub struct AppState {
    pub resolver: PathResolver,
    pub settings: SettingsStore,
    pub health: HealthChecker,
    /// Config root chosen in the settings, applied to every later request.
    pub config_root_override: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Build the state, seeding the config-root override from saved settings.
    pub fn new(resolver: PathResolver, settings: SettingsStore, health: HealthChecker) -> Self {
        let seeded = settings.read().config_root_override;
        if let Some(root) = seeded.as_deref() {
            info!(root, "Using saved config root override");
        }

        Self {
            resolver,
            settings,
            health,
            config_root_override: Arc::new(RwLock::new(seeded)),
        }
    }

    /// Resolve the stores for one request. The override is read once.
    pub async fn context(&self) -> ConsoleContext {
        let config_root_override = self.config_root_override.read().await.clone();
        ConsoleContext::new(
            self.resolver.clone(),
            self.settings.read(),
            config_root_override.as_deref(),
        )
    }

    pub async fn set_config_root_override(&self, root: Option<String>) {
        *self.config_root_override.write().await = root;
    }
}
