use std::path::PathBuf;

use serde::Serialize;

use crate::context::ConsoleContext;
use crate::settings::AppSettings;

/// Where the console is looking and whether the config parsed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub config_path: PathBuf,
    pub config_read_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
    pub workspace_path: Option<PathBuf>,
    pub settings: AppSettings,
}

impl StatusSnapshot {
    pub fn collect(ctx: &ConsoleContext) -> Self {
        let config = ctx.config().read();
        Self {
            config_path: config.config_path,
            config_read_ok: config.error.is_none(),
            config_error: config.error,
            workspace_path: ctx.workspace_dir(),
            settings: ctx.settings().clone(),
        }
    }
}
