//! Confirmation Gate
//!
//! Decides whether a gated action may proceed. A suppressed identifier
//! skips the dialog entirely; otherwise the dialog presenter collaborator
//! shows the alert (with a "don't ask again" toggle when an identifier was
//! supplied) and the user's choice decides.

use crate::error::ControlError;
use crate::suppression::SuppressionStore;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Content of a confirmation alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDescriptor {
    pub title: String,
    pub message: String,
}

impl AlertDescriptor {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        AlertDescriptor {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// User's answer to a confirmation alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Accepted {
        /// The "don't ask again" toggle state. Only meaningful when the
        /// alert offered suppression.
        suppress_future: bool,
    },
    Cancelled,
}

/// Dialog presentation collaborator (sheets, message boxes).
#[async_trait]
pub trait DialogPresenter: Send + Sync {
    /// Present a confirmation alert and return the user's choice.
    /// `offer_suppression` controls whether the alert carries the
    /// "don't ask again" toggle.
    async fn confirm(&self, alert: &AlertDescriptor, offer_suppression: bool) -> DialogChoice;

    /// Present an informational message.
    async fn show_message(&self, title: &str, info: &str);

    /// Present an error.
    async fn show_error(&self, error: &ControlError);
}

/// Gates actions behind a confirmation dialog with persistent suppression.
pub struct ConfirmationGate {
    store: Arc<dyn SuppressionStore>,
    presenter: Arc<dyn DialogPresenter>,
}

impl ConfirmationGate {
    pub fn new(store: Arc<dyn SuppressionStore>, presenter: Arc<dyn DialogPresenter>) -> Self {
        ConfirmationGate { store, presenter }
    }

    /// Ask the user to confirm an action.
    ///
    /// Returns `Ok(Some(value))` when the action ran (immediately for a
    /// suppressed identifier, otherwise after user acceptance) and
    /// `Ok(None)` when the user cancelled. Cancellation is a normal
    /// outcome, not an error, and changes no suppression state. The store
    /// is written at most once per call, only on acceptance with the
    /// toggle set.
    pub async fn confirm<F, Fut, T>(
        &self,
        alert: &AlertDescriptor,
        suppression_id: Option<&str>,
        action: F,
    ) -> Result<Option<T>, ControlError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ControlError>>,
    {
        if let Some(id) = suppression_id {
            if self.store.get(id)? {
                debug!(identifier = id, "confirmation suppressed");
                return action().await.map(Some);
            }
        }

        match self
            .presenter
            .confirm(alert, suppression_id.is_some())
            .await
        {
            DialogChoice::Accepted { suppress_future } => {
                if suppress_future {
                    if let Some(id) = suppression_id {
                        debug!(identifier = id, "suppression recorded");
                        self.store.set(id, true)?;
                    }
                }
                action().await.map(Some)
            }
            DialogChoice::Cancelled => Ok(None),
        }
    }
}
