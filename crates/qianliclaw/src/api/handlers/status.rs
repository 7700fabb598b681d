//! Status and health handlers.

use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use tracing::instrument;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::status::{HealthResult, StatusSnapshot};

use super::{OkResponse, optional_json};

#[instrument(skip(state))]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    let ctx = state.context().await;
    Json(StatusSnapshot::collect(&ctx))
}

/// Run `openclaw health`, with the CLI path from the body or the saved settings.
#[instrument(skip(state, body))]
pub async fn run_health_check(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<HealthResult>> {
    let requested = optional_json(&body)?
        .as_ref()
        .and_then(|body| body.get("openclawCliPath"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let cli_path = match requested {
        Some(path) => Some(path),
        None => state.settings.read().openclaw_cli_path,
    };

    Ok(Json(state.health.check(cli_path.as_deref()).await))
}

pub async fn liveness() -> Json<OkResponse> {
    Json(OkResponse::ok())
}
