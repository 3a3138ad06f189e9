//! `dirmap whoami` command - Show the authenticated account.

use std::path::Path;

use anyhow::{Context, Result};
use dirmap_core::UserDetails;
use dirmap_github::FetchOptions;

use super::utils;
use crate::output;

/// Run the whoami command.
pub fn run(config_path: &Path, json: bool) -> Result<()> {
    let config = utils::load_config(config_path)?;
    let manager = utils::manager(&config, FetchOptions::default())?;
    let rt = utils::runtime()?;

    let spinner = output::spinner("Fetching account...");
    let user = rt.block_on(manager.get_user_details());
    output::finish(spinner);
    let user = user.context("Failed to fetch user details")?;

    if json {
        output::essential(&serde_json::to_string_pretty(&user)?);
    } else {
        print_user(&user);
    }
    Ok(())
}

fn print_user(user: &UserDetails) {
    output::headline(&user.login, "");
    if let Some(name) = &user.name {
        output::detail(&output::field("name", name));
    }
    output::detail(&output::field("type", &user.account_type.to_string()));
    if let Some(email) = &user.email {
        output::detail(&output::field("email", email));
    }
    if let Some(repos) = user.public_repos {
        output::detail(&output::field("public repos", &repos.to_string()));
    }
    output::detail(&output::field("profile", &user.html_url));
    output::detail("");
}
