//! Suppression Store
//!
//! Persists "always allow without asking" decisions per suppression
//! identifier. Entries are never evicted; once an identifier is suppressed
//! it stays suppressed until explicit user action outside this crate.

pub mod persistence;

pub use persistence::SledSuppressionStore;

use crate::error::StoreError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key→boolean settings store for confirmation suppression.
///
/// Implementations must be safe under concurrent access from multiple
/// confirmation requests.
pub trait SuppressionStore: Send + Sync {
    /// Whether `identifier` has a recorded "don't ask again" decision.
    /// Unknown identifiers read as `false`.
    fn get(&self, identifier: &str) -> Result<bool, StoreError>;

    fn set(&self, identifier: &str, suppress: bool) -> Result<(), StoreError>;
}

/// In-memory store for tests and transient sessions.
#[derive(Default)]
pub struct MemorySuppressionStore {
    entries: RwLock<HashMap<String, bool>>,
}

impl MemorySuppressionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SuppressionStore for MemorySuppressionStore {
    fn get(&self, identifier: &str) -> Result<bool, StoreError> {
        Ok(self.entries.read().get(identifier).copied().unwrap_or(false))
    }

    fn set(&self, identifier: &str, suppress: bool) -> Result<(), StoreError> {
        self.entries.write().insert(identifier.to_string(), suppress);
        Ok(())
    }
}
