//! Gitdeck: Repository Action Controller
//!
//! The controller core of a desktop Git client. Mediates between a UI shell
//! and a single repository: queues and tracks asynchronous remote and stash
//! operations, gates disruptive actions behind a confirmation dialog with
//! persistent per-action suppression, and coordinates which of the two
//! content views (history browsing vs. commit authoring) is active.
//!
//! The UI shell, the git plumbing, and the dialog rendering are external
//! collaborators injected through the traits in [`backend`], [`confirm`],
//! and [`view`].

pub mod backend;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod logging;
pub mod operation;
pub mod queue;
pub mod suppression;
pub mod types;
pub mod view;

pub use backend::RepositoryBackend;
pub use confirm::{AlertDescriptor, ConfirmationGate, DialogChoice, DialogPresenter};
pub use controller::{RepositoryController, SubmitStatus};
pub use error::{BackendError, ControlError, StoreError};
pub use operation::{OperationDescriptor, OperationKey, OperationKind};
pub use queue::{OperationObserver, OperationOutcome, OperationQueue, OperationReport, RequestId};
pub use suppression::SuppressionStore;
pub use types::{GitRef, RefKind, RepositoryHandle, SearchMode};
pub use view::{ContentView, ViewKind, ViewSlot};
