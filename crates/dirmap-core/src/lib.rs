//! # dirmap-core
//!
//! Provider-neutral pieces of dirmap: the records providers return, the
//! nested [`DirectoryStructure`] model, the [`Provider`] trait with its
//! [`ProviderManager`] façade, and TOML configuration.

pub mod config;
pub mod error;
pub mod provider;
pub mod structure;
pub mod types;

pub use config::{Config, GitHubConfig, RetryConfig};
pub use error::{Error, Result};
pub use provider::{Provider, ProviderManager};
pub use structure::{DirectoryEntry, DirectoryStructure, EntryKind};
pub use types::{AccountType, RepositoryDetails, UserDetails};
