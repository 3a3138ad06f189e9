//! Error types for dirmap-github.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token rejected by GitHub (401, or 403 outside the rate limit).
    #[error("GitHub authentication failed - check the OAuth token")]
    AuthenticationFailed,

    /// Token not found.
    #[error("no GitHub token found - set GITHUB_OAUTH_TOKEN or GITHUB_TOKEN, or run `gh auth login`")]
    NoToken,

    /// Token failed the format check before any request was made.
    #[error("invalid GitHub token: {0}")]
    InvalidToken(&'static str),

    /// Repository or resource not found, or not visible with this token.
    #[error("not found or no access: {0}")]
    NotFound(String),

    /// Still rate limited after the retry budget ran out.
    #[error("GitHub API rate limit exceeded after {attempts} attempt(s) - wait and try again")]
    RateLimitExceeded { attempts: u32 },

    /// Still receiving server errors after the retry budget ran out.
    #[error("GitHub API unavailable ({status}) after {attempts} attempt(s)")]
    ServiceUnavailable { status: u16, attempts: u32 },

    /// Repository URL can't be split into owner and name.
    #[error("cannot parse repository URL: {0}")]
    InvalidRepoUrl(String),

    /// Configured API base URL can't be used.
    #[error("invalid GitHub API URL: {0}")]
    InvalidApiUrl(String),

    /// GitHub cut a single tree listing short, so the walk can't be completed.
    #[error("tree listing truncated by GitHub at {path}")]
    TruncatedTree { path: String },

    /// API error with status code.
    #[error("GitHub API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Network error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse GitHub response: {0}")]
    Parse(#[from] serde_json::Error),

    /// File content couldn't be decoded.
    #[error("failed to decode content of {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Building the directory structure failed.
    #[error(transparent)]
    Core(#[from] dirmap_core::Error),

    /// IO error (e.g., reading gh CLI token).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error means the credentials were rejected or absent.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::NoToken | Self::InvalidToken(_)
        )
    }
}
