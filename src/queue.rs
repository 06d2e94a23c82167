//! Operation Queue
//!
//! Submits and tracks asynchronous remote/stash operations against the
//! repository backend. The queue is the sole serialization point: it
//! enforces single-flight semantics per operation key, so conflicting
//! operations on the same target never run concurrently. Execution happens
//! on spawned tasks and never blocks the submitter.

use crate::backend::RepositoryBackend;
use crate::error::ControlError;
use crate::operation::{OperationDescriptor, OperationKey, OperationKind};
use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

/// Request ID for tracking completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Generate the next request ID (for internal use and testing)
    pub fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        RequestId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Failure of one sub-operation (for fetch-all, one configured remote).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubFailure {
    pub target: String,
    pub message: String,
}

/// Per-target outcome of an operation.
///
/// Single operations carry one entry in `succeeded` or `failed`; fetch-all
/// carries one entry per configured remote. Earlier failures are never
/// dropped when later sub-operations succeed.
#[derive(Debug, Clone, Default)]
pub struct OperationReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<SubFailure>,
}

impl OperationReport {
    fn success(target: impl Into<String>) -> Self {
        OperationReport {
            succeeded: vec![target.into()],
            failed: Vec::new(),
        }
    }

    fn failure(target: impl Into<String>, message: impl Into<String>) -> Self {
        OperationReport {
            succeeded: Vec::new(),
            failed: vec![SubFailure {
                target: target.into(),
                message: message.into(),
            }],
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Combined failure message. A lone failure keeps the backend's message
    /// verbatim; aggregated failures are prefixed with their target, and
    /// partial successes are listed so nothing is silently dropped.
    pub fn combined_message(&self) -> String {
        if self.failed.len() == 1 && self.succeeded.is_empty() {
            return self.failed[0].message.clone();
        }
        let failures = self
            .failed
            .iter()
            .map(|f| format!("{}: {}", f.target, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        if self.succeeded.is_empty() {
            failures
        } else {
            format!("{} (succeeded: {})", failures, self.succeeded.join(", "))
        }
    }
}

/// Completion of a submitted operation, delivered to the observer.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub id: RequestId,
    pub key: OperationKey,
    /// Human-readable label, e.g. "Pull main from origin".
    pub label: String,
    pub report: OperationReport,
}

impl OperationOutcome {
    /// The outcome as a controller result; failures become a
    /// [`ControlError::BackendFailure`] with the combined message.
    pub fn as_result(&self) -> Result<(), ControlError> {
        if self.report.is_success() {
            Ok(())
        } else {
            Err(ControlError::BackendFailure {
                context: self.label.clone(),
                message: self.report.combined_message(),
            })
        }
    }
}

/// Receives operation completions.
///
/// Called from the worker task after the backend resolves. The in-flight
/// key is released only after this returns, so for any given key the
/// observer sees completions in submission order.
#[async_trait]
pub trait OperationObserver: Send + Sync {
    async fn operation_finished(&self, outcome: &OperationOutcome);
}

/// Queue statistics, exposed for the UI's activity indicator.
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    pub submitted: usize,
    pub in_flight: usize,
    pub completed: usize,
    pub failed: usize,
    /// Duplicate submissions rejected by single-flight.
    pub rejected: usize,
}

#[derive(Debug)]
struct InFlight {
    id: RequestId,
}

/// Single-flight operation queue for one repository.
pub struct OperationQueue {
    backend: Arc<dyn RepositoryBackend>,
    observer: Arc<dyn OperationObserver>,
    /// Index of in-flight operations by single-flight key.
    in_flight: Arc<Mutex<HashMap<OperationKey, InFlight>>>,
    stats: Arc<RwLock<QueueStats>>,
    idle: Arc<Notify>,
}

impl OperationQueue {
    pub fn new(backend: Arc<dyn RepositoryBackend>, observer: Arc<dyn OperationObserver>) -> Self {
        OperationQueue {
            backend,
            observer,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            stats: Arc::new(RwLock::new(QueueStats::default())),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Submit an operation for asynchronous execution.
    ///
    /// Validation, the single-flight check, and default-remote resolution
    /// all happen before any backend operation call. A submission whose key
    /// matches an in-flight operation is rejected with
    /// [`ControlError::OperationInProgress`]; duplicates are never coalesced.
    /// Returns as soon as the operation is handed to a worker task; the
    /// completion is delivered to the observer.
    pub async fn submit(&self, mut descriptor: OperationDescriptor) -> Result<RequestId, ControlError> {
        descriptor.validate()?;
        let key = descriptor.key();
        let id = RequestId::next();

        {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(existing) = in_flight.get(&key) {
                debug!(%key, existing_id = existing.id.as_u64(), "duplicate submission rejected");
                self.stats.write().rejected += 1;
                return Err(ControlError::OperationInProgress { key });
            }
            in_flight.insert(key.clone(), InFlight { id });
        }

        // Upstream resolution is a repository-config read; a missing
        // upstream fails the submission with zero operation calls issued.
        if descriptor.remote.is_none()
            && matches!(descriptor.kind, OperationKind::Pull | OperationKind::Push)
        {
            match self
                .backend
                .resolve_default_remote(descriptor.branch.as_ref())
                .await
            {
                Ok(Some(remote)) => {
                    debug!(%key, remote = %remote, "resolved default remote");
                    descriptor.remote = Some(remote);
                }
                Ok(None) => {
                    self.release(&key).await;
                    let branch = descriptor
                        .branch
                        .map(|b| b.name)
                        .unwrap_or_else(|| "current".to_string());
                    return Err(ControlError::NoDefaultRemote { branch });
                }
                Err(err) => {
                    self.release(&key).await;
                    return Err(ControlError::backend(descriptor.describe(), err));
                }
            }
        }

        {
            let mut stats = self.stats.write();
            stats.submitted += 1;
            stats.in_flight += 1;
        }
        info!(%key, id = id.as_u64(), "operation submitted");

        let backend = Arc::clone(&self.backend);
        let observer = Arc::clone(&self.observer);
        let in_flight = Arc::clone(&self.in_flight);
        let stats = Arc::clone(&self.stats);
        let idle = Arc::clone(&self.idle);
        let task_key = key.clone();
        tokio::spawn(async move {
            let label = descriptor.describe();
            let report = execute(backend.as_ref(), &descriptor).await;
            {
                let mut stats = stats.write();
                stats.in_flight -= 1;
                if report.is_success() {
                    stats.completed += 1;
                } else {
                    stats.failed += 1;
                }
            }
            if report.is_success() {
                info!(key = %task_key, id = id.as_u64(), "operation completed");
            } else {
                warn!(
                    key = %task_key,
                    id = id.as_u64(),
                    failures = report.failed.len(),
                    "operation failed"
                );
            }
            let outcome = OperationOutcome {
                id,
                key: task_key.clone(),
                label,
                report,
            };
            observer.operation_finished(&outcome).await;
            in_flight.lock().await.remove(&task_key);
            idle.notify_waiters();
        });

        Ok(id)
    }

    /// Whether an operation with this key is currently in flight.
    pub async fn is_in_flight(&self, key: &OperationKey) -> bool {
        self.in_flight.lock().await.contains_key(key)
    }

    /// Wait until no operation is in flight. Completions have already been
    /// delivered to the observer when this returns.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.in_flight.lock().await.is_empty() {
                return;
            }
            notified.await;
        }
    }

    pub fn stats(&self) -> QueueStats {
        self.stats.read().clone()
    }

    async fn release(&self, key: &OperationKey) {
        self.in_flight.lock().await.remove(key);
        self.idle.notify_waiters();
    }
}

/// Run one operation against the backend and collect the per-target report.
///
/// Fetch-all issues one fetch per configured remote, all concurrently;
/// the concurrency bound is the backend's own.
async fn execute(backend: &dyn RepositoryBackend, descriptor: &OperationDescriptor) -> OperationReport {
    let key = descriptor.key();
    match (descriptor.kind, &descriptor.branch, &descriptor.remote) {
        (OperationKind::Fetch, _, Some(remote)) => match backend.fetch(remote).await {
            Ok(()) => OperationReport::success(&remote.name),
            Err(err) => OperationReport::failure(&remote.name, err.message),
        },
        (OperationKind::FetchAll, _, _) => {
            let remotes = match backend.remotes().await {
                Ok(remotes) => remotes,
                Err(err) => return OperationReport::failure("remotes", err.message),
            };
            let fetches = remotes.iter().map(|remote| async move {
                (remote.name.clone(), backend.fetch(remote).await)
            });
            let mut report = OperationReport::default();
            for (name, result) in join_all(fetches).await {
                match result {
                    Ok(()) => report.succeeded.push(name),
                    Err(err) => report.failed.push(SubFailure {
                        target: name,
                        message: err.message,
                    }),
                }
            }
            report
        }
        (OperationKind::Pull, Some(branch), Some(remote)) => {
            match backend.pull(branch, remote, descriptor.rebase).await {
                Ok(()) => OperationReport::success(&key.target),
                Err(err) => OperationReport::failure(&key.target, err.message),
            }
        }
        (OperationKind::Push, branch, Some(remote)) => {
            match backend.push(branch.as_ref(), remote).await {
                Ok(()) => OperationReport::success(&key.target),
                Err(err) => OperationReport::failure(&key.target, err.message),
            }
        }
        (OperationKind::StashSave, _, _) => {
            match backend.stash_save(descriptor.keep_index).await {
                Ok(()) => OperationReport::success(&key.target),
                Err(err) => OperationReport::failure(&key.target, err.message),
            }
        }
        (OperationKind::StashPop, _, _) => match backend.stash_pop().await {
            Ok(()) => OperationReport::success(&key.target),
            Err(err) => OperationReport::failure(&key.target, err.message),
        },
        // Unreachable after validation and resolution.
        _ => OperationReport::failure(&key.target, "operation descriptor incomplete"),
    }
}
