//! # dirmap-github
//!
//! GitHub provider for dirmap: token validation, account and repository
//! metadata, and full directory listings built from the git trees API.
//!
//! Every request runs under a [`RetryPolicy`] that backs off exponentially on
//! server errors and honors GitHub's rate-limit headers.
//!
//! # Security
//!
//! Authentication tokens are stored using `SecretString` which automatically
//! zeroizes memory when dropped, reducing credential exposure in memory dumps.

mod auth;
mod client;
mod clock;
mod error;
mod managers;
mod provider;
mod repo_url;
mod retry;
#[cfg(test)]
mod test_mocks;
pub mod traits;
mod types;

pub use auth::{Auth, TOKEN_ENV_VARS, Token};
pub use client::{ClientConfig, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT, GitHubClient};
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use managers::{GitHubAuthManager, GitHubUserManager};
pub use provider::{FetchOptions, GitHubProvider};
pub use repo_url::RepoRef;
pub use retry::{
    RetryPolicy, RetryReason, RetryState, is_rate_limit_exhausted, rate_limit_hint,
    rate_limit_reset_at,
};
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use traits::GitHubApi;
pub use types::{Tree, TreeEntry, TreeEntryKind};
