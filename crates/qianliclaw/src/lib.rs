//! Local admin console backend for the OpenClaw agent runtime.
//!
//! Reads and writes the OpenClaw JSON5 config, the workspace markdown files
//! and the console's own settings, and runs `openclaw health` on request.

pub mod api;
pub mod app_config;
pub mod context;
pub mod openclaw;
pub mod paths;
pub mod settings;
pub mod status;
pub mod workspace;

pub use context::ConsoleContext;
pub use paths::{ConfigRoot, PathResolver};
