//! Provider-neutral record types.

use serde::{Deserialize, Serialize};

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    /// Login name.
    pub login: String,

    /// Numeric account ID.
    pub id: u64,

    /// Display name.
    pub name: Option<String>,

    /// Public email address.
    pub email: Option<String>,

    /// Avatar image URL.
    pub avatar_url: Option<String>,

    /// Profile page URL.
    pub html_url: String,

    /// Number of public repositories.
    pub public_repos: Option<u64>,

    /// Account type.
    pub account_type: AccountType,
}

/// Kind of account behind a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// A person.
    User,
    /// An organization.
    Organization,
    /// An app or bot account.
    Bot,
    /// Anything the provider reports that we don't model.
    Other(String),
}

impl AccountType {
    /// Map a provider's type string.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        match value {
            "User" => Self::User,
            "Organization" => Self::Organization,
            "Bot" => Self::Bot,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::Organization => f.write_str("Organization"),
            Self::Bot => f.write_str("Bot"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// Repository metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    /// Numeric repository ID.
    pub id: u64,

    /// Repository name.
    pub name: String,

    /// `owner/name`.
    pub full_name: String,

    /// Owner login.
    pub owner: String,

    /// Repository description.
    pub description: Option<String>,

    /// Whether the repository is private.
    pub private: bool,

    /// Whether the repository is a fork.
    pub fork: bool,

    /// Whether the repository is archived.
    pub archived: bool,

    /// Default branch name.
    pub default_branch: String,

    /// Repository page URL.
    pub html_url: String,

    /// HTTPS clone URL.
    pub clone_url: Option<String>,

    /// Primary language.
    pub language: Option<String>,

    /// Size in kilobytes as reported by the provider.
    pub size: Option<u64>,

    /// Star count.
    pub stargazers_count: u64,

    /// Fork count.
    pub forks_count: u64,

    /// Open issue count.
    pub open_issues_count: u64,
}
