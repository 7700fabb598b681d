//! API route definitions.

use std::path::Path;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use super::handlers;
use super::state::AppState;

/// Request bodies larger than this are rejected.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RouterOptions<'a> {
    pub body_limit: usize,
    /// Built console UI served for every non-API path.
    pub web_dir: Option<&'a Path>,
}

impl Default for RouterOptions<'_> {
    fn default() -> Self {
        Self {
            body_limit: DEFAULT_BODY_LIMIT,
            web_dir: None,
        }
    }
}

/// Create the application router with default options.
pub fn create_router(state: AppState) -> Router {
    create_router_with(state, RouterOptions::default())
}

pub fn create_router_with(state: AppState, options: RouterOptions<'_>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api = Router::new()
        .route("/health", get(handlers::liveness))
        .route(
            "/config",
            get(handlers::get_config).put(handlers::put_config),
        )
        .route("/config/schema", get(handlers::get_config_schema))
        .route("/workspace/files", get(handlers::list_workspace_files))
        .route(
            "/workspace/files/{name}",
            get(handlers::get_workspace_file).put(handlers::put_workspace_file),
        )
        .route("/status", get(handlers::get_status))
        .route("/status/health", post(handlers::run_health_check))
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .with_state(state);

    let mut router = Router::new().nest("/api", api);

    if let Some(dir) = options.web_dir {
        info!(dir = %dir.display(), "Serving console UI");
        router = router.fallback_service(
            ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html"))),
        );
    }

    router
        .layer(DefaultBodyLimit::max(options.body_limit))
        .layer(build_cors_layer())
        .layer(trace_layer)
}

/// The console is a local tool: any origin is mirrored back.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .allow_credentials(true)
}
