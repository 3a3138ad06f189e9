//! `dirmap init` command - Write a default config file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use dirmap_core::Config;

use crate::output;

/// Run the init command.
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists - pass --force to overwrite",
            config_path.display()
        );
    }

    Config::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    output::success(&format!("Wrote {}", config_path.display()));
    output::detail("  Set GITHUB_OAUTH_TOKEN or run `gh auth login` to authenticate.");
    Ok(())
}
