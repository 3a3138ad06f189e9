//! dirmap CLI - Map the directory structure of GitHub repositories.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{Cli, Commands, utils};

fn main() {
    let cli = Cli::parse();
    output::set_quiet(cli.quiet);
    init_tracing(cli.verbose, cli.quiet);

    let config_path = utils::config_path(cli.config);

    let result = match cli.command {
        Commands::Init { force } => commands::init::run(&config_path, force),
        Commands::Auth => commands::auth::run(&config_path),
        Commands::Whoami { json } => commands::whoami::run(&config_path, json),
        Commands::Repo { owner, repo, json } => {
            commands::repo::run(&config_path, &owner, &repo, json)
        }
        Commands::Tree { url, json, content } => {
            commands::tree::run(&config_path, &url, json, content)
        }
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` or the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("dirmap={level}"))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
