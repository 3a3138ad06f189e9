//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod auth;
pub mod completions;
pub mod init;
pub mod repo;
pub mod tree;
pub mod utils;
pub mod whoami;

/// dirmap - map the directory structure of GitHub repositories.
#[derive(Parser)]
#[command(name = "dirmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file [default: .dirmap.toml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress informational output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file.
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check that GitHub accepts the configured token.
    ///
    /// Exits with status 1 when the token is rejected.
    Auth,

    /// Show the account the token belongs to.
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show repository metadata.
    Repo {
        /// Repository owner
        owner: String,

        /// Repository name
        repo: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the directory structure of a repository.
    ///
    /// Accepts `https://github.com/owner/repo`, a `/tree/<ref>` URL, SSH
    /// remotes, or plain `owner/repo`.
    Tree {
        /// Repository URL
        url: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Include the text of every file (JSON only shows it)
        #[arg(long)]
        content: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
