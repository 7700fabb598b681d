//! API request handlers, one module per resource:
//! - `config`: OpenClaw config read/write and section schema
//! - `workspace`: workspace markdown files
//! - `settings`: console settings
//! - `status`: status snapshot, CLI health check, liveness

mod config;
mod settings;
mod status;
mod workspace;

use axum::body::Bytes;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiResult;

pub use config::{get_config, get_config_schema, put_config};
pub use settings::{get_settings, put_settings};
pub use status::{get_status, liveness, run_health_check};
pub use workspace::{get_workspace_file, list_workspace_files, put_workspace_file};

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Parse a body that may be absent. Blank bodies are `None`.
fn optional_json(body: &Bytes) -> ApiResult<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}
