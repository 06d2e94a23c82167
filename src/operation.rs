//! Operation descriptors.
//!
//! A descriptor is created when a user action is invoked, validated and
//! keyed by the queue, and discarded on completion.

use crate::error::ControlError;
use crate::types::{GitRef, RefKind};
use std::fmt;

/// Kind of a queued repository operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fetch,
    FetchAll,
    Pull,
    Push,
    StashSave,
    StashPop,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperationKind::Fetch => "fetch",
            OperationKind::FetchAll => "fetch-all",
            OperationKind::Pull => "pull",
            OperationKind::Push => "push",
            OperationKind::StashSave => "stash-save",
            OperationKind::StashPop => "stash-pop",
        };
        f.write_str(label)
    }
}

/// Single-flight identity of an operation: at most one in-flight operation
/// per key at any time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub kind: OperationKind,
    pub target: String,
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.target)
    }
}

/// A fully specified request against the repository backend.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    /// Target branch (pull, push).
    pub branch: Option<GitRef>,
    /// Target remote (fetch, pull, push). `None` for pull/push means the
    /// branch's configured upstream, resolved at submission time.
    pub remote: Option<GitRef>,
    /// Pull only.
    pub rebase: bool,
    /// Stash-save only; passed to the backend unmodified.
    pub keep_index: bool,
}

impl OperationDescriptor {
    pub fn fetch(remote: GitRef) -> Self {
        OperationDescriptor {
            kind: OperationKind::Fetch,
            branch: None,
            remote: Some(remote),
            rebase: false,
            keep_index: false,
        }
    }

    pub fn fetch_all() -> Self {
        OperationDescriptor {
            kind: OperationKind::FetchAll,
            branch: None,
            remote: None,
            rebase: false,
            keep_index: false,
        }
    }

    pub fn pull(branch: GitRef, remote: Option<GitRef>, rebase: bool) -> Self {
        OperationDescriptor {
            kind: OperationKind::Pull,
            branch: Some(branch),
            remote,
            rebase,
            keep_index: false,
        }
    }

    pub fn push(branch: Option<GitRef>, remote: Option<GitRef>) -> Self {
        OperationDescriptor {
            kind: OperationKind::Push,
            branch,
            remote,
            rebase: false,
            keep_index: false,
        }
    }

    pub fn stash_save(keep_index: bool) -> Self {
        OperationDescriptor {
            kind: OperationKind::StashSave,
            branch: None,
            remote: None,
            rebase: false,
            keep_index,
        }
    }

    pub fn stash_pop() -> Self {
        OperationDescriptor {
            kind: OperationKind::StashPop,
            branch: None,
            remote: None,
            rebase: false,
            keep_index: false,
        }
    }

    /// Single-flight key for this descriptor.
    ///
    /// Fetch is keyed by remote, fetch-all by a wildcard, pull and push by
    /// branch (so pushes to the same branch via different remotes conflict),
    /// stash operations by a fixed target.
    ///
    /// A pull/push with no branch is keyed by the literal target `current`,
    /// not by whichever branch is checked out: keying is a pure function of
    /// the descriptor and never consults the repository. A caller mixing
    /// branch-less and explicit-branch submissions for the checked-out
    /// branch therefore gets two distinct keys; callers wanting those to
    /// conflict must resolve the current branch before building the
    /// descriptor.
    pub fn key(&self) -> OperationKey {
        let target = match self.kind {
            OperationKind::Fetch => self
                .remote
                .as_ref()
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            OperationKind::FetchAll => "*".to_string(),
            OperationKind::Pull | OperationKind::Push => self
                .branch
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_else(|| "current".to_string()),
            OperationKind::StashSave | OperationKind::StashPop => "stash".to_string(),
        };
        OperationKey {
            kind: self.kind,
            target,
        }
    }

    /// Validate the descriptor without contacting the backend.
    pub fn validate(&self) -> Result<(), ControlError> {
        if let Some(branch) = &self.branch {
            if branch.kind != RefKind::LocalBranch {
                return Err(ControlError::InvalidOperation(format!(
                    "'{}' is not a local branch",
                    branch.name
                )));
            }
        }
        if let Some(remote) = &self.remote {
            if remote.kind != RefKind::Remote {
                return Err(ControlError::InvalidOperation(format!(
                    "'{}' is not a remote",
                    remote.name
                )));
            }
        }
        match self.kind {
            OperationKind::Fetch => {
                if self.remote.is_none() {
                    return Err(ControlError::InvalidOperation(
                        "fetch requires a remote".to_string(),
                    ));
                }
            }
            OperationKind::Pull => {
                if self.branch.is_none() {
                    return Err(ControlError::InvalidOperation(
                        "pull requires a branch".to_string(),
                    ));
                }
            }
            OperationKind::FetchAll
            | OperationKind::Push
            | OperationKind::StashSave
            | OperationKind::StashPop => {}
        }
        Ok(())
    }

    /// Human-readable label used in messages and error contexts,
    /// e.g. "Fetch origin" or "Pull main from origin".
    pub fn describe(&self) -> String {
        let branch = self
            .branch
            .as_ref()
            .map(|b| b.name.as_str())
            .unwrap_or("current branch");
        match self.kind {
            OperationKind::Fetch => match &self.remote {
                Some(remote) => format!("Fetch {}", remote.name),
                None => "Fetch".to_string(),
            },
            OperationKind::FetchAll => "Fetch all remotes".to_string(),
            OperationKind::Pull => {
                let verb = if self.rebase { "Pull (rebase)" } else { "Pull" };
                match &self.remote {
                    Some(remote) => format!("{} {} from {}", verb, branch, remote.name),
                    None => format!("{} {}", verb, branch),
                }
            }
            OperationKind::Push => match &self.remote {
                Some(remote) => format!("Push {} to {}", branch, remote.name),
                None => format!("Push {}", branch),
            },
            OperationKind::StashSave => {
                if self.keep_index {
                    "Stash save (keep index)".to_string()
                } else {
                    "Stash save".to_string()
                }
            }
            OperationKind::StashPop => "Stash pop".to_string(),
        }
    }
}
