//! Nested directory structure built from a provider's flat listing.
//!
//! Providers report a repository as a flat list of paths. [`DirectoryStructure`]
//! turns that into a tree where every entry sits under its parent directory:
//! duplicate paths are rejected, and ancestors missing from the listing are
//! synthesized so no entry ever points at a parent that doesn't exist.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a directory entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory; the only kind that can have children.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Git submodule.
    Submodule,
}

impl EntryKind {
    /// Whether entries of this kind are leaves of the tree.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        !matches!(self, Self::Directory)
    }
}

/// A single file or directory in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Last path segment.
    pub name: String,

    /// Slash-separated path relative to the repository root.
    pub path: String,

    /// Entry kind.
    pub kind: EntryKind,

    /// Depth below the root; root-level entries are level 0.
    pub level: usize,

    /// Size in bytes (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Object SHA reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    /// Decoded file content, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Child entries, sorted by name (directories only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DirectoryEntry>,
}

impl DirectoryEntry {
    /// Create an entry for `path`. Name and level are derived from the path.
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        let level = path.matches('/').count();
        Self {
            name,
            path,
            kind,
            level,
            size: None,
            sha: None,
            content: None,
            children: Vec::new(),
        }
    }

    /// Create a file entry.
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::File)
    }

    /// Create a directory entry.
    pub fn directory(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::Directory)
    }

    /// Set the size.
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the object SHA.
    #[must_use]
    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    /// Attach file content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Whether this entry is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}

/// A repository's directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStructure {
    /// Root-level entries, sorted by name.
    pub entries: Vec<DirectoryEntry>,
}

impl DirectoryStructure {
    /// Build a tree from a flat listing.
    ///
    /// Children of incoming entries are ignored; nesting comes from paths alone.
    ///
    /// # Errors
    /// - [`Error::InvalidPath`] for empty, absolute, or dotted paths
    /// - [`Error::DuplicatePath`] when a path is listed twice
    /// - [`Error::NotADirectory`] when a path is nested under a non-directory
    pub fn from_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Result<Self> {
        let mut by_path: BTreeMap<String, DirectoryEntry> = BTreeMap::new();

        for entry in entries {
            validate_path(&entry.path)?;
            let entry = DirectoryEntry {
                size: entry.size,
                sha: entry.sha,
                content: entry.content,
                ..DirectoryEntry::new(entry.path, entry.kind)
            };

            if by_path.contains_key(&entry.path) {
                return Err(Error::DuplicatePath(entry.path));
            }
            by_path.insert(entry.path.clone(), entry);
        }

        let listed: Vec<String> = by_path.keys().cloned().collect();
        for path in &listed {
            let mut current = parent_of(path);
            while let Some(parent) = current {
                match by_path.get(parent) {
                    Some(existing) if existing.is_dir() => break,
                    Some(_) => {
                        return Err(Error::NotADirectory {
                            path: path.clone(),
                            parent: parent.to_string(),
                        });
                    }
                    None => {
                        by_path.insert(parent.to_string(), DirectoryEntry::directory(parent));
                    }
                }
                current = parent_of(parent);
            }
        }

        let mut children: BTreeMap<Option<String>, Vec<String>> = BTreeMap::new();
        for path in by_path.keys() {
            children
                .entry(parent_of(path).map(str::to_string))
                .or_default()
                .push(path.clone());
        }

        let roots = children.remove(&None).unwrap_or_default();
        let entries = roots
            .iter()
            .filter_map(|path| assemble(path, &mut by_path, &mut children))
            .collect();

        Ok(Self { entries })
    }

    /// Whether the structure has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries at every level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walk().len()
    }

    /// Number of leaf entries (everything that isn't a directory).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.walk().iter().filter(|e| e.kind.is_leaf()).count()
    }

    /// Number of regular files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.count_kind(EntryKind::File)
    }

    /// Number of directories.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.count_kind(EntryKind::Directory)
    }

    fn count_kind(&self, kind: EntryKind) -> usize {
        self.walk().iter().filter(|e| e.kind == kind).count()
    }

    /// All entries in depth-first pre-order.
    #[must_use]
    pub fn walk(&self) -> Vec<&DirectoryEntry> {
        let mut out = Vec::new();
        let mut stack: Vec<&DirectoryEntry> = self.entries.iter().rev().collect();
        while let Some(entry) = stack.pop() {
            out.push(entry);
            stack.extend(entry.children.iter().rev());
        }
        out
    }

    /// Look up an entry by path.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&DirectoryEntry> {
        let mut level = &self.entries;
        let mut found = None;
        for segment in path.trim_matches('/').split('/') {
            let entry = level.iter().find(|e| e.name == segment)?;
            level = &entry.children;
            found = Some(entry);
        }
        found
    }

    /// Render the tree the way `tree(1)` draws it.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_level(&self.entries, "", &mut out);
        out
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn validate_path(path: &str) -> Result<()> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.ends_with('/')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(())
}

fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

fn assemble(
    path: &str,
    by_path: &mut BTreeMap<String, DirectoryEntry>,
    children: &mut BTreeMap<Option<String>, Vec<String>>,
) -> Option<DirectoryEntry> {
    let mut entry = by_path.remove(path)?;
    if let Some(child_paths) = children.remove(&Some(path.to_string())) {
        entry.children = child_paths
            .iter()
            .filter_map(|child| assemble(child, by_path, children))
            .collect();
    }
    Some(entry)
}

fn render_level(entries: &[DirectoryEntry], prefix: &str, out: &mut String) {
    for (i, entry) in entries.iter().enumerate() {
        let last = i + 1 == entries.len();
        let branch = if last { "└── " } else { "├── " };
        let suffix = if entry.is_dir() { "/" } else { "" };
        let _ = writeln!(out, "{prefix}{branch}{}{suffix}", entry.name);

        if !entry.children.is_empty() {
            let extension = if last { "    " } else { "│   " };
            render_level(&entry.children, &format!("{prefix}{extension}"), out);
        }
    }
}
