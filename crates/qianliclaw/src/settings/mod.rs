//! Console UI settings.
//!
//! A small JSON record of user preferences kept at `~/.qianliclaw/settings.json`,
//! independent of the OpenClaw config root.

mod store;

pub use store::{AppSettings, SettingsError, SettingsStore, SettingsUpdate};
