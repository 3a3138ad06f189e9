//! Repository URL parsing.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

/// Owner/name of a repository, plus an optional ref named in the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name without a `.git` suffix.
    pub repo: String,
    /// Branch, tag, or SHA from a `/tree/<ref>` or `/blob/<ref>` URL.
    pub git_ref: Option<String>,
}

impl RepoRef {
    /// Parse a repository URL.
    ///
    /// Accepts `https://host/owner/repo` (with optional trailing slash,
    /// `.git` suffix, or `/tree/<ref>/...` tail), `ssh://git@host/owner/repo`,
    /// scp-style `git@host:owner/repo.git`, `host/owner/repo`, and bare
    /// `owner/repo`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRepoUrl`] when no owner/name pair can be found.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || Error::InvalidRepoUrl(input.to_string());

        if trimmed.is_empty() {
            return Err(invalid());
        }

        let path = if trimmed.contains("://") {
            let url = Url::parse(trimmed).map_err(|_| invalid())?;
            if !matches!(url.scheme(), "http" | "https" | "ssh" | "git") || url.host().is_none() {
                return Err(invalid());
            }
            url.path().to_string()
        } else if let Some((user_host, path)) = scp_parts(trimmed) {
            if user_host.is_empty() {
                return Err(invalid());
            }
            path.to_string()
        } else {
            let first = trimmed.split('/').next().unwrap_or_default();
            if first.contains('.') && trimmed.matches('/').count() >= 2 {
                // host/owner/repo without a scheme
                trimmed[first.len()..].to_string()
            } else {
                trimmed.to_string()
            }
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (owner, repo, rest) = match segments.as_slice() {
            [owner, repo, rest @ ..] => (*owner, *repo, rest),
            _ => return Err(invalid()),
        };

        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if !is_valid_name(owner) || !is_valid_name(repo) {
            return Err(invalid());
        }

        let git_ref = match rest {
            [] => None,
            ["tree" | "blob", git_ref, ..] => Some((*git_ref).to_string()),
            // Other pages under the repo (issues, pulls, ...) still identify it
            _ => None,
        };

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref,
        })
    }
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(git_ref) = &self.git_ref {
            write!(f, "@{git_ref}")?;
        }
        Ok(())
    }
}

/// Split `git@host:owner/repo` into (`git@host`, `owner/repo`).
fn scp_parts(input: &str) -> Option<(&str, &str)> {
    let (user_host, path) = input.split_once(':')?;
    if user_host.contains('/') || !user_host.contains('@') {
        return None;
    }
    Some((user_host, path))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
