//! `dirmap repo` command - Show repository metadata.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use dirmap_core::RepositoryDetails;
use dirmap_github::FetchOptions;

use super::utils;
use crate::output;

/// Run the repo command.
pub fn run(config_path: &Path, owner: &str, repo: &str, json: bool) -> Result<()> {
    let config = utils::load_config(config_path)?;
    let manager = utils::manager(&config, FetchOptions::default())?;
    let rt = utils::runtime()?;

    let spinner = output::spinner(&format!("Fetching {owner}/{repo}..."));
    let details = rt.block_on(manager.get_repository_details(owner, repo));
    output::finish(spinner);
    let details = details.with_context(|| format!("Failed to fetch {owner}/{repo}"))?;

    if json {
        output::essential(&serde_json::to_string_pretty(&details)?);
    } else {
        print_repo(&details);
    }
    Ok(())
}

fn print_repo(repo: &RepositoryDetails) {
    output::headline(
        &repo.full_name,
        &output::visibility(repo.private, repo.archived),
    );
    if let Some(description) = &repo.description {
        output::detail(&format!("  {}", description.dimmed()));
    }
    output::detail(&output::field("branch", &repo.default_branch));
    if let Some(language) = &repo.language {
        output::detail(&output::field("language", language));
    }
    output::detail(&output::field(
        "stars",
        &format!(
            "{} ({} forks, {} open issues)",
            repo.stargazers_count, repo.forks_count, repo.open_issues_count
        ),
    ));
    if repo.fork {
        output::detail(&output::field("fork", "yes"));
    }
    output::detail(&output::field("url", &repo.html_url));
    output::detail("");
}
