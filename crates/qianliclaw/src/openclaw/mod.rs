//! OpenClaw runtime configuration.

mod document;
mod schema;
mod store;

pub use document::{ConfigDocument, NotAnObject};
pub use schema::{CONFIG_SECTIONS, ConfigSchema, ConfigSection, config_schema};
pub use store::{ConfigSnapshot, ConfigStore, ConfigStoreError};
