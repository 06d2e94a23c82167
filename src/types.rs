//! Core value types shared across the controller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of a named reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    /// A local branch (e.g. `main`).
    LocalBranch,
    /// A configured remote (e.g. `origin`).
    Remote,
}

/// A named pointer to a branch or remote.
///
/// Refs are immutable values. They are never cached across operations: the
/// controller looks them up fresh for each submission so an operation never
/// acts on a ref the backend has since moved or deleted out-of-band.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitRef {
    pub name: String,
    pub kind: RefKind,
}

impl GitRef {
    pub fn local_branch(name: impl Into<String>) -> Self {
        GitRef {
            name: name.into(),
            kind: RefKind::LocalBranch,
        }
    }

    pub fn remote(name: impl Into<String>) -> Self {
        GitRef {
            name: name.into(),
            kind: RefKind::Remote,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.kind == RefKind::Remote
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identifies the single repository a controller instance operates on.
///
/// Owned exclusively by the controller for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryHandle {
    /// Display name, usually the directory name.
    pub name: String,
    /// Working-tree root.
    pub path: PathBuf,
}

impl RepositoryHandle {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        RepositoryHandle {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Search mode forwarded verbatim to the active content view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Match against commit messages.
    Message,
    /// Match against author names.
    Author,
    /// Match against changed file content.
    Content,
}
