//! Provider abstraction and the façade that fronts it.
//!
//! A [`Provider`] is a remote source-hosting backend. [`ProviderManager`]
//! forwards every call to the provider it wraps, so an embedding application
//! can hold one manager without caring which backend is behind it.

use std::future::Future;

use crate::structure::DirectoryStructure;
use crate::types::{RepositoryDetails, UserDetails};

/// A remote repository host.
pub trait Provider: Send + Sync {
    /// Error type surfaced by this provider.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Check that the provider accepts the configured credentials.
    fn authenticate(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Same check as [`Provider::authenticate`], named after the token it validates.
    fn validate_token(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Details of the authenticated user.
    fn get_user_details(&self) -> impl Future<Output = Result<UserDetails, Self::Error>> + Send;

    /// Metadata of a repository.
    fn get_repository_details(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<RepositoryDetails, Self::Error>> + Send;

    /// Full directory tree of the repository at `repo_url`.
    fn fetch_directory_structure(
        &self,
        repo_url: &str,
    ) -> impl Future<Output = Result<DirectoryStructure, Self::Error>> + Send;
}

/// Façade over a single provider.
#[derive(Debug, Clone)]
pub struct ProviderManager<P> {
    provider: P,
}

impl<P: Provider> ProviderManager<P> {
    /// Wrap a provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Check the provider's credentials.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn authenticate(&self) -> Result<bool, P::Error> {
        self.provider.authenticate().await
    }

    /// Validate the provider's token.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn validate_token(&self) -> Result<bool, P::Error> {
        self.provider.validate_token().await
    }

    /// Details of the authenticated user.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn get_user_details(&self) -> Result<UserDetails, P::Error> {
        self.provider.get_user_details().await
    }

    /// Metadata of a repository.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn get_repository_details(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails, P::Error> {
        self.provider.get_repository_details(owner, repo).await
    }

    /// Directory tree of a repository.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn fetch_directory_structure(
        &self,
        repo_url: &str,
    ) -> Result<DirectoryStructure, P::Error> {
        self.provider.fetch_directory_structure(repo_url).await
    }
}
