//! Authentication handling for GitHub API.

use std::fmt;
use std::process::Command;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Environment variables checked by [`Auth::auto`], in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_OAUTH_TOKEN", "GITHUB_TOKEN"];

/// An OAuth token, held as a `SecretString` so it is zeroized on drop.
#[derive(Clone)]
pub struct Token(SecretString);

impl Token {
    /// Wrap a token after a basic format check.
    ///
    /// # Errors
    /// Returns [`Error::InvalidToken`] for empty tokens or tokens containing
    /// whitespace or control characters.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::InvalidToken("token is empty"));
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidToken(
                "token contains whitespace or control characters",
            ));
        }
        Ok(Self(SecretString::from(token)))
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    /// The raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

/// Authentication method for GitHub API.
#[derive(Debug, Clone)]
pub enum Auth {
    /// Use token from gh CLI.
    GhCli,

    /// Use token from environment variable.
    EnvVar(String),

    /// Use a specific token.
    Token(SecretString),
}

impl Auth {
    /// Create auth from the first available method.
    ///
    /// Tries in order: `GITHUB_OAUTH_TOKEN`, `GITHUB_TOKEN`, gh CLI.
    #[must_use]
    pub fn auto() -> Self {
        TOKEN_ENV_VARS
            .iter()
            .find(|var| std::env::var(var).is_ok_and(|v| !v.trim().is_empty()))
            .map_or(Self::GhCli, |var| Self::EnvVar((*var).into()))
    }

    /// Use an explicitly configured token, falling back to [`Auth::auto`].
    #[must_use]
    pub fn from_config(token: Option<&str>) -> Self {
        token.map_or_else(Self::auto, |t| Self::Token(SecretString::from(t)))
    }

    /// Resolve the authentication to a token.
    ///
    /// # Errors
    /// Returns error if token cannot be obtained or fails the format check.
    pub fn resolve(&self) -> Result<Token> {
        match self {
            Self::GhCli => get_gh_token(),
            Self::EnvVar(var) => std::env::var(var)
                .map_err(|_| Error::NoToken)
                .and_then(Token::new),
            Self::Token(t) => Token::new(t.expose_secret()),
        }
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self::auto()
    }
}

/// Get GitHub token from gh CLI.
fn get_gh_token() -> Result<Token> {
    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        return Err(Error::NoToken);
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if token.is_empty() {
        return Err(Error::NoToken);
    }

    Token::new(token)
}
