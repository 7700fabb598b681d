//! Config handlers.

use std::path::PathBuf;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::openclaw::{ConfigDocument, ConfigSchema, config_schema};

use super::OkResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub config: Option<ConfigDocument>,
    pub config_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Current config. A file that fails to parse answers 500 with its path.
#[instrument(skip(state))]
pub async fn get_config(State(state): State<AppState>) -> Response {
    let ctx = state.context().await;
    let snapshot = ctx.config().read();

    match snapshot.error {
        Some(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ConfigResponse {
                config: None,
                config_path: snapshot.config_path,
                error: Some(error),
            }),
        )
            .into_response(),
        None => Json(ConfigResponse {
            config: Some(snapshot.config),
            config_path: snapshot.config_path,
            error: None,
        })
        .into_response(),
    }
}

/// Replace the whole config.
#[instrument(skip(state, body))]
pub async fn put_config(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<OkResponse>> {
    let Json(value) = body?;
    let config = ConfigDocument::try_from(value)
        .map_err(|_| ApiError::bad_request("Body must be a JSON object"))?;

    let ctx = state.context().await;
    ctx.config().write(&config)?;

    info!(path = %ctx.config().path().display(), "Config updated");
    Ok(Json(OkResponse::ok()))
}

#[instrument]
pub async fn get_config_schema() -> Json<ConfigSchema> {
    Json(config_schema())
}
