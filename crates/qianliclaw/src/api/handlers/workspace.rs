//! Workspace file handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::workspace::WorkspaceListing;

use super::{OkResponse, optional_json};

#[derive(Debug, Serialize)]
pub struct WorkspaceFileResponse {
    pub content: String,
    pub name: String,
}

#[instrument(skip(state))]
pub async fn list_workspace_files(State(state): State<AppState>) -> Json<WorkspaceListing> {
    let ctx = state.context().await;
    Json(ctx.workspace().list())
}

#[instrument(skip(state))]
pub async fn get_workspace_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<WorkspaceFileResponse>> {
    let ctx = state.context().await;
    let content = ctx.workspace().read(&name)?;
    Ok(Json(WorkspaceFileResponse { content, name }))
}

/// Overwrite a workspace file with `{content}`. Anything but a string writes an empty file.
#[instrument(skip(state, body))]
pub async fn put_workspace_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult<Json<OkResponse>> {
    let body = optional_json(&body)?;
    let content = body
        .as_ref()
        .and_then(|body| body.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let ctx = state.context().await;
    ctx.workspace().write(&name, content)?;

    info!(file = %name, "Workspace file updated");
    Ok(Json(OkResponse::ok()))
}
