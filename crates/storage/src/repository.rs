use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lab_core::model::{ProgressError, ProgressKey, ProgressRecord, ProgressUpdate, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    InvalidProgress(#[from] ProgressError),
}

/// Repository contract for learner progress.
///
/// Keys are validated when `UserId`/`ExperimentId` are constructed, so
/// implementations never see a malformed key.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the record for a key.
    ///
    /// Returns `Ok(None)` when the learner has not committed any step yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn get_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, StorageError>;

    /// List every record belonging to a user, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn list_progress(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Create or shallow-merge the record for the update's key.
    ///
    /// Omitted fields default to `0/false/0` on creation and keep their prior
    /// values otherwise. `last_updated` is set to `now` on every write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidProgress` for out-of-range fields, or
    /// other storage errors.
    async fn upsert_progress(
        &self,
        update: ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, StorageError>;
}

/// Volatile in-memory progress table.
///
/// Writes for the same key are serialized by the table lock; the last write wins.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<ProgressKey, ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn list_progress(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|(key, _)| &key.user_id == user_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn upsert_progress(
        &self,
        update: ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let key = update.key();
        if let Some(existing) = guard.get_mut(&key) {
            existing.merge(&update, now)?;
            return Ok(existing.clone());
        }

        let record = ProgressRecord::create(update, now)?;
        guard.insert(key, record.clone());
        Ok(record)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
