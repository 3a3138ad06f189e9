//! `dirmap tree` command - Print a repository's directory structure.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use dirmap_github::{FetchOptions, RepoRef};

use super::utils;
use crate::output;

/// Run the tree command.
pub fn run(config_path: &Path, url: &str, json: bool, content: bool) -> Result<()> {
    // Reject a bad URL before resolving a token or touching the network
    let repo_ref = RepoRef::parse(url)?;

    let config = utils::load_config(config_path)?;
    let options = FetchOptions {
        include_content: content,
    };
    let manager = utils::manager(&config, options)?;
    let rt = utils::runtime()?;

    let spinner = output::spinner(&format!("Fetching tree of {repo_ref}..."));
    let structure = rt.block_on(manager.fetch_directory_structure(url));
    output::finish(spinner);
    let structure =
        structure.with_context(|| format!("Failed to fetch directory structure of {repo_ref}"))?;

    if json {
        output::essential(&structure.to_json_pretty()?);
        return Ok(());
    }

    if content && !structure.is_empty() {
        output::info("File content is only included in --json output");
    }
    output::detail(&repo_ref.to_string().bold().to_string());
    output::essential(structure.render().trim_end());
    output::detail("");
    output::detail(&output::tree_summary(&structure));
    Ok(())
}
