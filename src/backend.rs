//! Repository backend collaborator.
//!
//! The low-level git execution layer lives outside this crate. The
//! controller drives it through this trait; every call is asynchronous and
//! suspends only at the process/network boundary.

use crate::error::BackendError;
use crate::types::GitRef;
use async_trait::async_trait;

/// Asynchronous interface to the underlying repository.
///
/// Each operation returns `Ok(())` on success or a [`BackendError`] whose
/// message is human-readable (merge conflict, network failure, auth
/// failure). The controller surfaces those messages verbatim.
#[async_trait]
pub trait RepositoryBackend: Send + Sync {
    /// The remote a branch is configured to track, or `None` when no
    /// upstream is configured. A repository-config read, not a network call.
    ///
    /// `branch` of `None` means the currently checked-out branch.
    async fn resolve_default_remote(
        &self,
        branch: Option<&GitRef>,
    ) -> Result<Option<GitRef>, BackendError>;

    /// All configured remotes, in configuration order.
    async fn remotes(&self) -> Result<Vec<GitRef>, BackendError>;

    async fn fetch(&self, remote: &GitRef) -> Result<(), BackendError>;

    async fn pull(
        &self,
        branch: &GitRef,
        remote: &GitRef,
        rebase: bool,
    ) -> Result<(), BackendError>;

    /// Push `branch` (or the current branch when `None`) to `remote`.
    async fn push(&self, branch: Option<&GitRef>, remote: &GitRef) -> Result<(), BackendError>;

    async fn stash_save(&self, keep_index: bool) -> Result<(), BackendError>;

    async fn stash_pop(&self) -> Result<(), BackendError>;
}
