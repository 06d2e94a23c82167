//! Persistence layer for the Suppression Store

use crate::error::StoreError;
use crate::suppression::SuppressionStore;
use bincode;
use serde::{Deserialize, Serialize};
use sled;
use std::path::Path;

/// On-disk record for one suppression decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SuppressionRecord {
    suppress: bool,
}

/// Sled-based implementation of SuppressionStore
///
/// Decisions survive application restarts. Sled serializes concurrent
/// access internally, so reads and writes from multiple confirmation
/// requests are safe.
pub struct SledSuppressionStore {
    db: sled::Db,
}

impl SledSuppressionStore {
    /// Open (or create) the store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)
            .map_err(|e| StoreError::Io(format!("failed to open settings database: {}", e)))?;
        Ok(Self { db })
    }
}

impl SuppressionStore for SledSuppressionStore {
    fn get(&self, identifier: &str) -> Result<bool, StoreError> {
        match self
            .db
            .get(identifier.as_bytes())
            .map_err(|e| StoreError::Io(format!("failed to read suppression record: {}", e)))?
        {
            Some(value) => {
                let record: SuppressionRecord = bincode::deserialize(&value).map_err(|e| {
                    StoreError::Codec(format!("failed to decode suppression record: {}", e))
                })?;
                Ok(record.suppress)
            }
            None => Ok(false),
        }
    }

    fn set(&self, identifier: &str, suppress: bool) -> Result<(), StoreError> {
        let value = bincode::serialize(&SuppressionRecord { suppress }).map_err(|e| {
            StoreError::Codec(format!("failed to encode suppression record: {}", e))
        })?;
        self.db
            .insert(identifier.as_bytes(), value)
            .map_err(|e| StoreError::Io(format!("failed to write suppression record: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| StoreError::Io(format!("failed to flush settings database: {}", e)))?;
        Ok(())
    }
}
