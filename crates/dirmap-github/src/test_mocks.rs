//! Mock implementation of `GitHubApi` for testing managers and the provider.

use std::collections::HashMap;
use std::sync::Mutex;

use dirmap_core::{AccountType, RepositoryDetails, UserDetails};

use crate::error::{Error, Result};
use crate::traits::GitHubApi;
use crate::types::Tree;

/// How the mock answers `get_authenticated_user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserResponse {
    Ok,
    Rejected,
    RateLimited,
}

/// Mock implementation of `GitHubApi` backed by in-memory fixtures.
pub struct MockGitHubApi {
    pub user_response: UserResponse,
    pub repos: HashMap<String, RepositoryDetails>,
    /// Trees keyed by tree-ish (ref name or SHA).
    pub trees: HashMap<String, Tree>,
    /// File contents keyed by path.
    pub contents: HashMap<String, String>,
    /// Every call made, in order, as a short description.
    pub calls: Mutex<Vec<String>>,
}

impl Default for MockGitHubApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitHubApi {
    pub fn new() -> Self {
        Self {
            user_response: UserResponse::Ok,
            repos: HashMap::new(),
            trees: HashMap::new(),
            contents: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user_response(mut self, response: UserResponse) -> Self {
        self.user_response = response;
        self
    }

    pub fn with_repo(mut self, owner: &str, name: &str, default_branch: &str) -> Self {
        self.repos
            .insert(format!("{owner}/{name}"), repository(owner, name, default_branch));
        self
    }

    /// Register a tree from `(path, type, sha)` triples.
    pub fn with_tree(mut self, tree_ish: &str, truncated: bool, entries: &[(&str, &str, &str)]) -> Self {
        let entries: Vec<serde_json::Value> = entries
            .iter()
            .map(|(path, kind, sha)| {
                let mode = match *kind {
                    "tree" => "040000",
                    "commit" => "160000",
                    _ => "100644",
                };
                serde_json::json!({
                    "path": path,
                    "mode": mode,
                    "type": kind,
                    "sha": sha,
                    "size": if *kind == "blob" { Some(12) } else { None }
                })
            })
            .collect();
        let tree = serde_json::from_value(serde_json::json!({
            "sha": tree_ish,
            "truncated": truncated,
            "tree": entries
        }))
        .unwrap_or_else(|e| panic!("bad tree fixture: {e}"));
        self.trees.insert(tree_ish.to_string(), tree);
        self
    }

    /// Override the SHA a registered tree reports for itself.
    pub fn with_tree_sha(mut self, tree_ish: &str, sha: &str) -> Self {
        if let Some(tree) = self.trees.get_mut(tree_ish) {
            tree.sha = sha.to_string();
        }
        self
    }

    pub fn with_content(mut self, path: &str, content: &str) -> Self {
        self.contents.insert(path.to_string(), content.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

pub fn user() -> UserDetails {
    UserDetails {
        login: "octocat".into(),
        id: 1,
        name: Some("The Octocat".into()),
        email: None,
        avatar_url: None,
        html_url: "https://github.com/octocat".into(),
        public_repos: Some(2),
        account_type: AccountType::User,
    }
}

pub fn repository(owner: &str, name: &str, default_branch: &str) -> RepositoryDetails {
    RepositoryDetails {
        id: 42,
        name: name.into(),
        full_name: format!("{owner}/{name}"),
        owner: owner.into(),
        description: None,
        private: false,
        fork: false,
        archived: false,
        default_branch: default_branch.into(),
        html_url: format!("https://github.com/{owner}/{name}"),
        clone_url: None,
        language: None,
        size: None,
        stargazers_count: 0,
        forks_count: 0,
        open_issues_count: 0,
    }
}

impl GitHubApi for MockGitHubApi {
    async fn get_authenticated_user(&self) -> Result<UserDetails> {
        self.record("user".into());
        match self.user_response {
            UserResponse::Ok => Ok(user()),
            UserResponse::Rejected => Err(Error::AuthenticationFailed),
            UserResponse::RateLimited => Err(Error::RateLimitExceeded { attempts: 5 }),
        }
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryDetails> {
        let key = format!("{owner}/{repo}");
        self.record(format!("repo {key}"));
        self.repos
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("repository {key}")))
    }

    async fn get_tree(
        &self,
        _owner: &str,
        _repo: &str,
        tree_ish: &str,
        recursive: bool,
    ) -> Result<Tree> {
        self.record(format!("tree {tree_ish} recursive={recursive}"));
        self.trees
            .get(tree_ish)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("tree {tree_ish}")))
    }

    async fn get_file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<Option<String>> {
        self.record(format!("content {path}@{}", git_ref.unwrap_or("HEAD")));
        Ok(self.contents.get(path).cloned())
    }
}
