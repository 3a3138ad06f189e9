//! GitHub implementation of the dirmap [`Provider`] trait.

use std::sync::Arc;

use dirmap_core::{DirectoryStructure, EntryKind, Provider, RepositoryDetails, UserDetails};

use crate::error::{Error, Result};
use crate::managers::{GitHubAuthManager, GitHubUserManager};
use crate::repo_url::RepoRef;
use crate::traits::GitHubApi;
use crate::types::{TreeEntry, TreeEntryKind};

/// What to fetch beyond the bare listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Fetch and decode the text of every regular file.
    pub include_content: bool,
}

/// GitHub provider: token validation, metadata lookups and tree listing.
#[derive(Debug)]
pub struct GitHubProvider<A> {
    auth: GitHubAuthManager<A>,
    users: GitHubUserManager<A>,
    api: Arc<A>,
    options: FetchOptions,
}

impl<A: GitHubApi> GitHubProvider<A> {
    /// Create a provider over an API client.
    pub fn new(api: A) -> Self {
        Self::from_shared(Arc::new(api))
    }

    /// Create a provider over an API client that is shared elsewhere.
    pub fn from_shared(api: Arc<A>) -> Self {
        Self {
            auth: GitHubAuthManager::new(Arc::clone(&api)),
            users: GitHubUserManager::new(Arc::clone(&api)),
            api,
            options: FetchOptions::default(),
        }
    }

    /// Set fetch options.
    #[must_use]
    pub const fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// The token validation manager.
    pub const fn auth(&self) -> &GitHubAuthManager<A> {
        &self.auth
    }

    /// The account/repository metadata manager.
    pub const fn users(&self) -> &GitHubUserManager<A> {
        &self.users
    }

    /// Fetch the full directory tree of the repository at `repo_url`.
    ///
    /// The ref comes from a `/tree/<ref>` URL tail when present, otherwise
    /// the repository's default branch is looked up first.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRepoUrl`] for an unparseable URL,
    /// [`Error::TruncatedTree`] when even a single-level listing is cut
    /// short, and propagates request failures.
    pub async fn fetch_directory_structure(&self, repo_url: &str) -> Result<DirectoryStructure> {
        let repo_ref = RepoRef::parse(repo_url)?;
        let owner = repo_ref.owner.as_str();
        let repo = repo_ref.repo.as_str();

        let git_ref = match &repo_ref.git_ref {
            Some(git_ref) => git_ref.clone(),
            None => {
                self.users
                    .get_repository_details(owner, repo)
                    .await?
                    .default_branch
            }
        };

        tracing::info!(repo = %repo_ref, git_ref = %git_ref, "fetching directory structure");

        let tree = self.api.get_tree(owner, repo, &git_ref, true).await?;
        let entries = if tree.truncated {
            tracing::warn!(
                repo = %repo_ref,
                listed = tree.entries.len(),
                "recursive listing truncated, walking subtrees"
            );
            self.walk_subtrees(owner, repo, &tree.sha).await?
        } else {
            tree.entries
        };

        let mut dir_entries = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut dir_entry = entry.into_directory_entry();
            if self.options.include_content && dir_entry.kind == EntryKind::File {
                let content = self
                    .api
                    .get_file_content(owner, repo, &dir_entry.path, Some(&git_ref))
                    .await?;
                if let Some(content) = content {
                    dir_entry = dir_entry.with_content(content);
                }
            }
            dir_entries.push(dir_entry);
        }

        let structure = DirectoryStructure::from_entries(dir_entries)?;
        tracing::info!(
            repo = %repo_ref,
            entries = structure.len(),
            files = structure.file_count(),
            "directory structure fetched"
        );
        Ok(structure)
    }

    /// List a tree one level at a time, descending into every subtree.
    async fn walk_subtrees(&self, owner: &str, repo: &str, root_sha: &str) -> Result<Vec<TreeEntry>> {
        let mut pending = vec![(String::new(), root_sha.to_string())];
        let mut entries = Vec::new();

        while let Some((prefix, sha)) = pending.pop() {
            let tree = self.api.get_tree(owner, repo, &sha, false).await?;
            if tree.truncated {
                tracing::warn!(path = %prefix, "subtree listing truncated");
                let path = if prefix.is_empty() { "/".to_string() } else { prefix };
                return Err(Error::TruncatedTree { path });
            }
            for entry in tree.entries {
                let entry = entry.under(&prefix);
                if entry.kind == TreeEntryKind::Tree {
                    pending.push((entry.path.clone(), entry.sha.clone()));
                }
                entries.push(entry);
            }
        }

        Ok(entries)
    }
}

impl<A: GitHubApi> Provider for GitHubProvider<A> {
    type Error = Error;

    async fn authenticate(&self) -> Result<bool> {
        self.auth.validate_token().await
    }

    async fn validate_token(&self) -> Result<bool> {
        self.auth.validate_token().await
    }

    async fn get_user_details(&self) -> Result<UserDetails> {
        self.users.get_user_details().await
    }

    async fn get_repository_details(&self, owner: &str, repo: &str) -> Result<RepositoryDetails> {
        self.users.get_repository_details(owner, repo).await
    }

    async fn fetch_directory_structure(&self, repo_url: &str) -> Result<DirectoryStructure> {
        self.fetch_directory_structure(repo_url).await
    }
}
