//! Error types for dirmap-core.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dirmap-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The same path appeared twice while building a directory structure.
    #[error("duplicate path in directory listing: {0}")]
    DuplicatePath(String),

    /// A path that can't be placed in a tree (empty, absolute, or with empty segments).
    #[error("invalid path in directory listing: '{0}'")]
    InvalidPath(String),

    /// A path is listed as a child of something that isn't a directory.
    #[error("'{path}' is nested under '{parent}', which is not a directory")]
    NotADirectory { path: String, parent: String },

    /// Configuration values that can't be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("toml serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
