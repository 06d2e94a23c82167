//! Action Orchestrator
//!
//! `RepositoryController` composes the confirmation gate, operation queue,
//! and view slot into the public surface a UI shell drives: plain callable
//! operations with no dependency on any particular event-dispatch
//! mechanism. Completions come back through the dialog presenter.

use crate::backend::RepositoryBackend;
use crate::config::{ConfirmationConfig, ControllerConfig};
use crate::confirm::{AlertDescriptor, ConfirmationGate, DialogPresenter};
use crate::error::ControlError;
use crate::operation::{OperationDescriptor, OperationKind};
use crate::queue::{OperationObserver, OperationOutcome, OperationQueue, RequestId};
use crate::suppression::SuppressionStore;
use crate::types::{GitRef, RepositoryHandle, SearchMode};
use crate::view::{ContentView, ViewKind, ViewSlot};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Result of invoking a gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The operation was handed to the queue.
    Submitted(RequestId),
    /// The user cancelled the confirmation dialog. Not an error.
    Declined,
}

/// Routes queue completions to the presentation collaborators.
struct CompletionRouter {
    presenter: Arc<dyn DialogPresenter>,
}

#[async_trait]
impl OperationObserver for CompletionRouter {
    async fn operation_finished(&self, outcome: &OperationOutcome) {
        match outcome.as_result() {
            Ok(()) => {
                let info = match outcome.report.succeeded.len() {
                    0 => "Nothing to do.".to_string(),
                    1 => "Completed.".to_string(),
                    _ => format!("Completed for {}.", outcome.report.succeeded.join(", ")),
                };
                self.presenter.show_message(&outcome.label, &info).await;
            }
            Err(err) => self.presenter.show_error(&err).await,
        }
    }
}

/// Confirmation classification for one descriptor.
///
/// Push publishes history to a shared remote and stash-pop rewrites the
/// working tree, so both are gated (each can be disabled in
/// [`ConfirmationConfig`]). Fetch, pull, and stash-save never prompt.
/// Push suppression is keyed by branch alone, so accepting "don't ask
/// again" for a branch covers pushes to it via any remote.
fn confirmation_for(
    policy: &ConfirmationConfig,
    descriptor: &OperationDescriptor,
) -> Option<(AlertDescriptor, Option<String>)> {
    match descriptor.kind {
        OperationKind::Push if policy.push => {
            let branch = descriptor
                .branch
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_else(|| "current".to_string());
            let target = descriptor
                .remote
                .as_ref()
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "its default remote".to_string());
            let alert = AlertDescriptor::new(
                descriptor.describe(),
                format!("Publish local commits on '{}' to {}?", branch, target),
            );
            Some((alert, Some(format!("push.{}", branch))))
        }
        OperationKind::StashPop if policy.stash_pop => {
            let alert = AlertDescriptor::new(
                "Stash pop",
                "Apply and drop the most recent stash? This modifies the working tree.",
            );
            Some((alert, Some("stash.pop".to_string())))
        }
        _ => None,
    }
}

/// The controller for one repository window.
///
/// Owns the repository handle exclusively for its lifetime. All operation
/// methods return as soon as the work is queued; results arrive through
/// the injected [`DialogPresenter`].
pub struct RepositoryController {
    handle: RepositoryHandle,
    queue: Arc<OperationQueue>,
    gate: ConfirmationGate,
    presenter: Arc<dyn DialogPresenter>,
    views: ViewSlot,
    policy: ConfirmationConfig,
}

impl RepositoryController {
    /// Wire up a controller. Activates the history view so the view slot
    /// is never empty afterwards.
    pub fn new(
        handle: RepositoryHandle,
        backend: Arc<dyn RepositoryBackend>,
        presenter: Arc<dyn DialogPresenter>,
        suppression: Arc<dyn SuppressionStore>,
        history_view: Arc<dyn ContentView>,
        commit_view: Arc<dyn ContentView>,
        config: &ControllerConfig,
    ) -> Self {
        let router = Arc::new(CompletionRouter {
            presenter: Arc::clone(&presenter),
        });
        let queue = Arc::new(OperationQueue::new(backend, router));
        let gate = ConfirmationGate::new(suppression, Arc::clone(&presenter));
        let views = ViewSlot::new(history_view, commit_view);
        views.activate(ViewKind::History);
        info!(repository = %handle.name, "controller initialized");
        RepositoryController {
            handle,
            queue,
            gate,
            presenter,
            views,
            policy: config.confirmations.clone(),
        }
    }

    pub fn handle(&self) -> &RepositoryHandle {
        &self.handle
    }

    /// The queue, exposed for activity indicators and shutdown draining.
    pub fn queue(&self) -> &OperationQueue {
        &self.queue
    }

    // Remote operations -----------------------------------------------------

    pub async fn fetch(&self, remote: GitRef) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::fetch(remote)).await
    }

    pub async fn fetch_all(&self) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::fetch_all()).await
    }

    pub async fn pull(&self, branch: GitRef, remote: GitRef) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::pull(branch, Some(remote), false))
            .await
    }

    pub async fn pull_rebase(
        &self,
        branch: GitRef,
        remote: GitRef,
    ) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::pull(branch, Some(remote), true))
            .await
    }

    /// Pull from the branch's configured upstream.
    pub async fn pull_default_remote(&self, branch: GitRef) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::pull(branch, None, false))
            .await
    }

    pub async fn pull_rebase_default_remote(
        &self,
        branch: GitRef,
    ) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::pull(branch, None, true))
            .await
    }

    /// Push `branch` (current branch when `None`) to `remote` (the
    /// branch's upstream when `None`).
    pub async fn push(
        &self,
        branch: Option<GitRef>,
        remote: Option<GitRef>,
    ) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::push(branch, remote)).await
    }

    // Stash operations ------------------------------------------------------

    pub async fn stash_save(&self) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::stash_save(false)).await
    }

    pub async fn stash_save_keeping_index(&self) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::stash_save(true)).await
    }

    pub async fn stash_pop(&self) -> Result<SubmitStatus, ControlError> {
        self.perform(OperationDescriptor::stash_pop()).await
    }

    // Views and search ------------------------------------------------------

    pub fn show_history_view(&self) {
        self.views.activate(ViewKind::History);
    }

    pub fn show_commit_view(&self) {
        self.views.activate(ViewKind::Commit);
    }

    pub fn active_view(&self) -> Option<ViewKind> {
        self.views.active()
    }

    /// Forward a live search query to the active view.
    ///
    /// An empty view slot is an internal consistency error; it is surfaced
    /// and aborts this action only.
    pub async fn set_search(&self, query: &str, mode: SearchMode) -> Result<(), ControlError> {
        match self.views.forward_search(query, mode) {
            Ok(()) => Ok(()),
            Err(err) => {
                error!(%err, "search forwarding failed");
                self.presenter.show_error(&err).await;
                Err(err)
            }
        }
    }

    // Presentation ----------------------------------------------------------

    pub async fn show_message(&self, title: &str, info: &str) {
        self.presenter.show_message(title, info).await;
    }

    pub async fn show_error(&self, error: &ControlError) {
        self.presenter.show_error(error).await;
    }

    // Internals -------------------------------------------------------------

    /// Route one descriptor through the confirmation gate (when its kind is
    /// classified as gated) and into the queue.
    async fn perform(&self, descriptor: OperationDescriptor) -> Result<SubmitStatus, ControlError> {
        match confirmation_for(&self.policy, &descriptor) {
            Some((alert, suppression_id)) => {
                let submitted = match self
                    .gate
                    .confirm(&alert, suppression_id.as_deref(), || {
                        self.submit_reporting(descriptor.clone())
                    })
                    .await
                {
                    Ok(submitted) => submitted,
                    Err(err) => {
                        // Submission failures were already surfaced by
                        // submit_reporting; store failures have not been.
                        if matches!(err, ControlError::Store(_)) {
                            self.presenter.show_error(&err).await;
                        }
                        return Err(err);
                    }
                };
                match submitted {
                    Some(id) => Ok(SubmitStatus::Submitted(id)),
                    None => {
                        info!(operation = %descriptor.describe(), "declined by user");
                        Ok(SubmitStatus::Declined)
                    }
                }
            }
            None => self
                .submit_reporting(descriptor)
                .await
                .map(SubmitStatus::Submitted),
        }
    }

    /// Submit to the queue, surfacing pre-flight failures (invalid
    /// descriptor, duplicate in flight, missing upstream) to the user.
    async fn submit_reporting(
        &self,
        descriptor: OperationDescriptor,
    ) -> Result<RequestId, ControlError> {
        match self.queue.submit(descriptor).await {
            Ok(id) => Ok(id),
            Err(err) => {
                self.presenter.show_error(&err).await;
                Err(err)
            }
        }
    }
}
