//! GitHub API types.

use dirmap_core::{DirectoryEntry, EntryKind};
use serde::{Deserialize, Serialize};

/// Git file mode GitHub uses for symbolic links.
const SYMLINK_MODE: &str = "120000";

/// A git tree as returned by `/repos/{owner}/{repo}/git/trees/{tree_ish}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Tree SHA.
    pub sha: String,

    /// Entries; paths are relative to this tree.
    #[serde(rename = "tree")]
    pub entries: Vec<TreeEntry>,

    /// Whether GitHub cut the listing short.
    #[serde(default)]
    pub truncated: bool,
}

/// A single entry of a git tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the tree that was listed.
    pub path: String,

    /// Git file mode (e.g. `100644`, `040000`, `120000`).
    pub mode: String,

    /// Object type.
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,

    /// Object SHA.
    pub sha: String,

    /// Blob size in bytes.
    pub size: Option<u64>,
}

/// Git object type of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    /// File or symlink.
    Blob,
    /// Directory.
    Tree,
    /// Submodule commit.
    Commit,
}

impl TreeEntry {
    /// Re-root the entry under `prefix` (the path of the tree it came from).
    #[must_use]
    pub fn under(mut self, prefix: &str) -> Self {
        if !prefix.is_empty() {
            self.path = format!("{prefix}/{}", self.path);
        }
        self
    }

    /// Directory-structure kind for this entry.
    #[must_use]
    pub fn entry_kind(&self) -> EntryKind {
        match self.kind {
            TreeEntryKind::Tree => EntryKind::Directory,
            TreeEntryKind::Commit => EntryKind::Submodule,
            TreeEntryKind::Blob if self.mode == SYMLINK_MODE => EntryKind::Symlink,
            TreeEntryKind::Blob => EntryKind::File,
        }
    }

    /// Convert to a provider-neutral directory entry.
    #[must_use]
    pub fn into_directory_entry(self) -> DirectoryEntry {
        let kind = self.entry_kind();
        let entry = DirectoryEntry::new(self.path, kind).with_sha(self.sha);
        match self.size {
            Some(size) if kind != EntryKind::Directory => entry.with_size(size),
            _ => entry,
        }
    }
}
