use std::fmt;

/// The markdown files the console may read and write in a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkspaceFile {
    User,
    Identity,
    Soul,
    Agents,
    Tools,
    Bootstrap,
}

impl WorkspaceFile {
    pub const ALL: [WorkspaceFile; 6] = [
        WorkspaceFile::User,
        WorkspaceFile::Identity,
        WorkspaceFile::Soul,
        WorkspaceFile::Agents,
        WorkspaceFile::Tools,
        WorkspaceFile::Bootstrap,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            WorkspaceFile::User => "USER.md",
            WorkspaceFile::Identity => "IDENTITY.md",
            WorkspaceFile::Soul => "SOUL.md",
            WorkspaceFile::Agents => "AGENTS.md",
            WorkspaceFile::Tools => "TOOLS.md",
            WorkspaceFile::Bootstrap => "BOOTSTRAP.md",
        }
    }

    /// Exact, case-sensitive match against the allow-list.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|file| file.file_name() == name)
    }
}

impl fmt::Display for WorkspaceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
