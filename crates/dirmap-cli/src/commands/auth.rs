//! `dirmap auth` command - Check that GitHub accepts the token.

use std::path::Path;

use anyhow::{Context, Result, bail};
use dirmap_github::FetchOptions;

use super::utils;
use crate::output;

/// Run the auth command.
pub fn run(config_path: &Path) -> Result<()> {
    let config = utils::load_config(config_path)?;
    let manager = utils::manager(&config, FetchOptions::default())?;
    let rt = utils::runtime()?;

    let spinner = output::spinner("Validating GitHub token...");
    let valid = rt.block_on(manager.validate_token());
    output::finish(spinner);

    if !valid.context("Could not validate the GitHub token")? {
        bail!("GitHub rejected the token - check GITHUB_OAUTH_TOKEN or run `gh auth login`");
    }

    output::success("GitHub token is valid");
    Ok(())
}
