//! View Slot
//!
//! Holds exactly one active content view out of the two the client offers:
//! history browsing and commit authoring. Transitions are atomic from the
//! caller's perspective; there is no intermediate state where search
//! forwarding is ambiguous.

use crate::error::ControlError;
use crate::types::SearchMode;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// The two mutually exclusive content views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    History,
    Commit,
}

/// A content view collaborator (graph browser, commit sheet).
pub trait ContentView: Send + Sync {
    fn activate(&self);
    fn deactivate(&self);
    fn apply_search(&self, query: &str, mode: SearchMode);
}

/// Two-slot toggle guaranteeing exactly one active view once initialized.
///
/// Mutated only through [`ViewSlot::activate`]; the transition (teardown of
/// the previous view, setup of the next) runs under one lock.
pub struct ViewSlot {
    history: Arc<dyn ContentView>,
    commit: Arc<dyn ContentView>,
    active: Mutex<Option<ViewKind>>,
}

impl ViewSlot {
    /// Create a slot with no active view. Callers activate an initial view
    /// immediately after construction.
    pub fn new(history: Arc<dyn ContentView>, commit: Arc<dyn ContentView>) -> Self {
        ViewSlot {
            history,
            commit,
            active: Mutex::new(None),
        }
    }

    /// Activate `kind`, tearing down the previously active view first.
    /// Idempotent: re-activating the current view performs no teardown or
    /// setup.
    pub fn activate(&self, kind: ViewKind) {
        let mut active = self.active.lock();
        if *active == Some(kind) {
            return;
        }
        if let Some(previous) = *active {
            self.view_for(previous).deactivate();
        }
        self.view_for(kind).activate();
        *active = Some(kind);
        debug!(?kind, "content view activated");
    }

    /// The currently active view kind, `None` only before initialization.
    pub fn active(&self) -> Option<ViewKind> {
        *self.active.lock()
    }

    /// Forward a search query to whichever view is active.
    ///
    /// An empty slot is an internal consistency error: post-initialization
    /// there is always an active view, so this returns
    /// [`ControlError::IllegalState`] rather than dropping the query.
    pub fn forward_search(&self, query: &str, mode: SearchMode) -> Result<(), ControlError> {
        let active = self.active.lock();
        match *active {
            Some(kind) => {
                self.view_for(kind).apply_search(query, mode);
                Ok(())
            }
            None => Err(ControlError::IllegalState(
                "search forwarded with no active view".to_string(),
            )),
        }
    }

    fn view_for(&self, kind: ViewKind) -> &dyn ContentView {
        match kind {
            ViewKind::History => self.history.as_ref(),
            ViewKind::Commit => self.commit.as_ref(),
        }
    }
}
