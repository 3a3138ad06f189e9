//! Token validation and account/repository lookups.

use std::sync::Arc;

use dirmap_core::{RepositoryDetails, UserDetails};

use crate::error::Result;
use crate::traits::GitHubApi;

/// Checks whether the configured token is accepted by GitHub.
#[derive(Debug)]
pub struct GitHubAuthManager<A> {
    api: Arc<A>,
}

impl<A: GitHubApi> GitHubAuthManager<A> {
    /// Create a manager over a shared API client.
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Validate the token with a lightweight authenticated request.
    ///
    /// Returns `Ok(false)` when GitHub rejects the token. Rate limiting and
    /// other failures are not a verdict on the token and are returned as
    /// errors.
    ///
    /// # Errors
    /// Returns any error other than an authentication rejection.
    pub async fn validate_token(&self) -> Result<bool> {
        match self.api.get_authenticated_user().await {
            Ok(user) => {
                tracing::info!(login = %user.login, "GitHub token is valid");
                Ok(true)
            }
            Err(e) if e.is_auth() => {
                tracing::warn!(error = %e, "GitHub rejected the token");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

/// Fetches account and repository metadata.
#[derive(Debug)]
pub struct GitHubUserManager<A> {
    api: Arc<A>,
}

impl<A: GitHubApi> GitHubUserManager<A> {
    /// Create a manager over a shared API client.
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Details of the user the token belongs to.
    ///
    /// # Errors
    /// Returns error if the request fails or the token is rejected.
    pub async fn get_user_details(&self) -> Result<UserDetails> {
        let user = self
            .api
            .get_authenticated_user()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "failed to fetch user details"))?;
        tracing::debug!(login = %user.login, "fetched user details");
        Ok(user)
    }

    /// Metadata of `owner/repo`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if the repository doesn't exist or isn't visible.
    pub async fn get_repository_details(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails> {
        let details = self
            .api
            .get_repository(owner, repo)
            .await
            .inspect_err(|e| {
                tracing::warn!(owner, repo, error = %e, "failed to fetch repository details");
            })?;
        tracing::debug!(
            repo = %details.full_name,
            default_branch = %details.default_branch,
            "fetched repository details"
        );
        Ok(details)
    }
}
