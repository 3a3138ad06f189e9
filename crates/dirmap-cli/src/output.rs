//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::Colorize;
use dirmap_core::DirectoryStructure;
use indicatif::{ProgressBar, ProgressStyle};

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "✓".green(), msg);
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print a detail line without prefix (suppressed in quiet mode).
pub fn detail(msg: &str) {
    if !is_quiet() {
        println!("{msg}");
    }
}

/// Print the headline of a record view.
///
/// Quiet mode prints only the bare `name`, so the result can still be piped.
pub fn headline(name: &str, badge: &str) {
    if is_quiet() {
        println!("{name}");
    } else if badge.is_empty() {
        println!();
        println!("  {}", name.bold());
    } else {
        println!();
        println!("  {} {}", name.bold(), badge);
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for results that should be available for piping, like JSON.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// A `label: value` line with the label dimmed.
#[must_use]
pub fn field(label: &str, value: &str) -> String {
    format!("  {:<12} {}", format!("{label}:").dimmed(), value)
}

/// Visibility badge for a repository.
#[must_use]
pub fn visibility(private: bool, archived: bool) -> String {
    let base = if private {
        "private".yellow().to_string()
    } else {
        "public".green().to_string()
    };
    if archived {
        format!("{base} {}", "archived".dimmed())
    } else {
        base
    }
}

/// The `N directories, M files` line `tree(1)` prints under a listing.
#[must_use]
pub fn tree_summary(structure: &DirectoryStructure) -> String {
    let dirs = structure.directory_count();
    let leaves = structure.leaf_count();
    format!(
        "{dirs} {}, {leaves} {}",
        if dirs == 1 { "directory" } else { "directories" },
        if leaves == 1 { "file" } else { "files" }
    )
}

/// Start a spinner for a network call (none in quiet mode).
///
/// Drawn on stderr, so it never mixes with piped output.
pub fn spinner(msg: &str) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Clear a spinner started with [`spinner`].
pub fn finish(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}
