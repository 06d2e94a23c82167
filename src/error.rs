//! Error types for the repository action controller.

use crate::operation::OperationKey;
use thiserror::Error;

/// A structured failure reported by the repository backend.
///
/// The message is produced by the backend (git output, network error text)
/// and is preserved verbatim all the way to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
        }
    }
}

/// Settings-store errors (suppression persistence).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings store I/O error: {0}")]
    Io(String),

    #[error("settings store codec error: {0}")]
    Codec(String),
}

/// Controller-level errors.
///
/// `InvalidOperation`, `OperationInProgress`, and `NoDefaultRemote` are
/// resolved locally and surfaced before the backend performs any operation.
/// `BackendFailure` wraps whatever the backend reported and is never retried
/// automatically. `IllegalState` marks an internal invariant violation; it
/// aborts the current action only.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("{key} is already in progress")]
    OperationInProgress { key: OperationKey },

    #[error("no default remote configured for branch '{branch}'")]
    NoDefaultRemote { branch: String },

    #[error("{context} failed: {message}")]
    BackendFailure { context: String, message: String },

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("settings store error: {0}")]
    Store(#[from] StoreError),
}

impl ControlError {
    /// Wrap a backend failure, keeping the backend's message verbatim.
    pub fn backend(context: impl Into<String>, err: BackendError) -> Self {
        ControlError::BackendFailure {
            context: context.into(),
            message: err.message,
        }
    }
}

impl From<config::ConfigError> for ControlError {
    fn from(err: config::ConfigError) -> Self {
        ControlError::InvalidOperation(format!("configuration error: {}", err))
    }
}
