//! HTTP API module.
//!
//! JSON endpoints under `/api` for the console UI.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use handlers::OkResponse;
pub use routes::{DEFAULT_BODY_LIMIT, RouterOptions, create_router, create_router_with};
pub use state::AppState;
