use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirmap_core::config::DEFAULT_CONFIG_FILE;
use dirmap_core::{Config, ProviderManager};
use dirmap_github::{Auth, ClientConfig, FetchOptions, GitHubClient, GitHubProvider};
use tokio::runtime::Runtime;

/// The GitHub-backed façade every network command drives.
pub type Manager = ProviderManager<GitHubProvider<GitHubClient>>;

/// Config path from `--config`, or the default file in the working directory.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load and validate the config file.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Resolve the token and build the provider façade.
pub fn manager(config: &Config, options: FetchOptions) -> Result<Manager> {
    let auth = Auth::from_config(config.github.oauth_token.as_deref());
    let token = auth.resolve().context("Failed to resolve a GitHub token")?;
    let client = GitHubClient::from_config(ClientConfig::from_config(config, token))
        .context("Failed to create GitHub client")?;
    tracing::debug!(?client, "GitHub client ready");
    Ok(ProviderManager::new(
        GitHubProvider::new(client).with_options(options),
    ))
}

/// Runtime for driving the async provider from a synchronous command.
pub fn runtime() -> Result<Runtime> {
    Runtime::new().context("Failed to start async runtime")
}
