//! Trait abstractions for GitHub API operations.
//!
//! This module defines the `GitHubApi` trait which abstracts the read-only
//! GitHub calls the managers need, so they can be driven by a mock in tests.

use std::future::Future;

use dirmap_core::{RepositoryDetails, UserDetails};

use crate::Result;
use crate::types::Tree;

/// Trait for GitHub API operations.
///
/// Implementations are expected to apply their own retry policy; callers see
/// only the terminal outcome of each call.
pub trait GitHubApi: Send + Sync {
    /// Get the user the token belongs to.
    fn get_authenticated_user(&self) -> impl Future<Output = Result<UserDetails>> + Send;

    /// Get repository metadata.
    fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<RepositoryDetails>> + Send;

    /// List a git tree by SHA or ref name.
    ///
    /// With `recursive`, GitHub flattens every subtree into one listing (and
    /// may truncate it for very large repositories).
    fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_ish: &str,
        recursive: bool,
    ) -> impl Future<Output = Result<Tree>> + Send;

    /// Get a file's decoded text content.
    ///
    /// Returns `None` when GitHub doesn't inline the content or it isn't UTF-8.
    fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}
