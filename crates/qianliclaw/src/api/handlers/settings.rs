//! Settings handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::settings::{AppSettings, SettingsUpdate};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub ok: bool,
    pub settings: AppSettings,
}

#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Json<AppSettings> {
    Json(state.settings.read())
}

/// Merge the provided fields into the saved settings.
///
/// The config-root override takes effect for every request after this one.
#[instrument(skip(state, body))]
pub async fn put_settings(
    State(state): State<AppState>,
    body: Result<Json<SettingsUpdate>, JsonRejection>,
) -> ApiResult<Json<SettingsResponse>> {
    let Json(update) = body?;
    let settings = state.settings.update(update)?;

    state
        .set_config_root_override(settings.config_root_override.clone())
        .await;

    info!(
        config_root_override = ?settings.config_root_override,
        "Settings updated"
    );
    Ok(Json(SettingsResponse { ok: true, settings }))
}
