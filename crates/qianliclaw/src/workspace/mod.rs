//! Workspace markdown files.
//!
//! Only six fixed files directly inside the workspace directory are reachable.
//! File names come from HTTP path parameters, so every access goes through the
//! allow-list and a containment check on the resulting path.

mod files;
mod store;

pub use files::WorkspaceFile;
pub use store::{
    WorkspaceError, WorkspaceFileEntry, WorkspaceListing, WorkspaceStore, resolve_workspace_dir,
};
