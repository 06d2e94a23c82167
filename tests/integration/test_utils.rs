//! Shared test doubles for controller integration tests.

use async_trait::async_trait;
use gitdeck::backend::RepositoryBackend;
use gitdeck::config::ControllerConfig;
use gitdeck::confirm::{AlertDescriptor, DialogChoice, DialogPresenter};
use gitdeck::controller::RepositoryController;
use gitdeck::error::{BackendError, ControlError};
use gitdeck::suppression::MemorySuppressionStore;
use gitdeck::types::{GitRef, RepositoryHandle, SearchMode};
use gitdeck::view::ContentView;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Scripted repository backend with per-operation call counters.
///
/// `hold()` makes every operation block on a semaphore until
/// `release_all()`, so tests can observe in-flight state deterministically.
#[derive(Default)]
pub struct MockBackend {
    pub remotes: Mutex<Vec<GitRef>>,
    /// branch name -> upstream remote
    pub upstreams: Mutex<HashMap<String, GitRef>>,
    /// remote name -> scripted fetch failure message
    pub fetch_failures: Mutex<HashMap<String, String>>,
    pub pull_failure: Mutex<Option<String>>,
    pub push_failure: Mutex<Option<String>>,

    pub fetch_calls: AtomicUsize,
    pub pull_calls: AtomicUsize,
    pub push_calls: AtomicUsize,
    pub stash_save_calls: AtomicUsize,
    pub stash_pop_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,

    pub pulls: Mutex<Vec<(String, String, bool)>>,
    pub pushes: Mutex<Vec<(Option<String>, String)>>,
    pub stash_saves: Mutex<Vec<bool>>,

    barrier: Mutex<Option<Arc<Semaphore>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remotes(remotes: &[&str]) -> Self {
        let backend = Self::default();
        *backend.remotes.lock() = remotes.iter().map(|r| GitRef::remote(*r)).collect();
        backend
    }

    pub fn set_upstream(&self, branch: &str, remote: &str) {
        self.upstreams
            .lock()
            .insert(branch.to_string(), GitRef::remote(remote));
    }

    pub fn fail_fetch(&self, remote: &str, message: &str) {
        self.fetch_failures
            .lock()
            .insert(remote.to_string(), message.to_string());
    }

    /// Block every subsequent operation until `release_all`.
    pub fn hold(&self) {
        *self.barrier.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_all(&self) {
        if let Some(barrier) = self.barrier.lock().as_ref() {
            barrier.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    async fn pass_barrier(&self) {
        let barrier = self.barrier.lock().clone();
        if let Some(barrier) = barrier {
            barrier
                .acquire()
                .await
                .expect("barrier semaphore closed")
                .forget();
        }
    }
}

#[async_trait]
impl RepositoryBackend for MockBackend {
    async fn resolve_default_remote(
        &self,
        branch: Option<&GitRef>,
    ) -> Result<Option<GitRef>, BackendError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let name = branch.map(|b| b.name.as_str()).unwrap_or("current");
        Ok(self.upstreams.lock().get(name).cloned())
    }

    async fn remotes(&self) -> Result<Vec<GitRef>, BackendError> {
        Ok(self.remotes.lock().clone())
    }

    async fn fetch(&self, remote: &GitRef) -> Result<(), BackendError> {
        self.pass_barrier().await;
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match self.fetch_failures.lock().get(&remote.name) {
            Some(message) => Err(BackendError::new(message.clone())),
            None => Ok(()),
        }
    }

    async fn pull(
        &self,
        branch: &GitRef,
        remote: &GitRef,
        rebase: bool,
    ) -> Result<(), BackendError> {
        self.pass_barrier().await;
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        self.pulls
            .lock()
            .push((branch.name.clone(), remote.name.clone(), rebase));
        match self.pull_failure.lock().clone() {
            Some(message) => Err(BackendError::new(message)),
            None => Ok(()),
        }
    }

    async fn push(&self, branch: Option<&GitRef>, remote: &GitRef) -> Result<(), BackendError> {
        self.pass_barrier().await;
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.pushes
            .lock()
            .push((branch.map(|b| b.name.clone()), remote.name.clone()));
        match self.push_failure.lock().clone() {
            Some(message) => Err(BackendError::new(message)),
            None => Ok(()),
        }
    }

    async fn stash_save(&self, keep_index: bool) -> Result<(), BackendError> {
        self.pass_barrier().await;
        self.stash_save_calls.fetch_add(1, Ordering::SeqCst);
        self.stash_saves.lock().push(keep_index);
        Ok(())
    }

    async fn stash_pop(&self) -> Result<(), BackendError> {
        self.pass_barrier().await;
        self.stash_pop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Dialog presenter double answering every alert with a scripted choice.
pub struct MockPresenter {
    pub choice: Mutex<DialogChoice>,
    pub prompts: AtomicUsize,
    pub messages: Mutex<Vec<(String, String)>>,
    pub errors: Mutex<Vec<String>>,
}

impl MockPresenter {
    pub fn accepting() -> Self {
        Self::with_choice(DialogChoice::Accepted {
            suppress_future: false,
        })
    }

    pub fn accepting_with_toggle() -> Self {
        Self::with_choice(DialogChoice::Accepted {
            suppress_future: true,
        })
    }

    pub fn cancelling() -> Self {
        Self::with_choice(DialogChoice::Cancelled)
    }

    pub fn with_choice(choice: DialogChoice) -> Self {
        MockPresenter {
            choice: Mutex::new(choice),
            prompts: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

#[async_trait]
impl DialogPresenter for MockPresenter {
    async fn confirm(&self, _alert: &AlertDescriptor, _offer_suppression: bool) -> DialogChoice {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.choice.lock()
    }

    async fn show_message(&self, title: &str, info: &str) {
        self.messages
            .lock()
            .push((title.to_string(), info.to_string()));
    }

    async fn show_error(&self, error: &ControlError) {
        self.errors.lock().push(error.to_string());
    }
}

/// Content view double recording lifecycle and search calls.
#[derive(Default)]
pub struct RecordingView {
    pub activations: AtomicUsize,
    pub deactivations: AtomicUsize,
    pub searches: Mutex<Vec<(String, SearchMode)>>,
}

impl ContentView for RecordingView {
    fn activate(&self) {
        self.activations.fetch_add(1, Ordering::SeqCst);
    }

    fn deactivate(&self) {
        self.deactivations.fetch_add(1, Ordering::SeqCst);
    }

    fn apply_search(&self, query: &str, mode: SearchMode) {
        self.searches.lock().push((query.to_string(), mode));
    }
}

pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub presenter: Arc<MockPresenter>,
    pub suppression: Arc<MemorySuppressionStore>,
    pub history: Arc<RecordingView>,
    pub commit: Arc<RecordingView>,
    pub controller: RepositoryController,
}

/// Build a fully wired controller over the given doubles.
pub fn harness(backend: MockBackend, presenter: MockPresenter) -> Harness {
    let backend = Arc::new(backend);
    let presenter = Arc::new(presenter);
    let suppression = Arc::new(MemorySuppressionStore::new());
    let history = Arc::new(RecordingView::default());
    let commit = Arc::new(RecordingView::default());
    let controller = RepositoryController::new(
        RepositoryHandle::new("demo", "/tmp/demo"),
        backend.clone(),
        presenter.clone(),
        suppression.clone(),
        history.clone(),
        commit.clone(),
        &ControllerConfig::default(),
    );
    Harness {
        backend,
        presenter,
        suppression,
        history,
        commit,
        controller,
    }
}
