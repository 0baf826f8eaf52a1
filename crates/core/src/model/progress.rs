use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ExperimentId, ProgressKey, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress percentage must be in [0, 100], got {0}")]
    PercentageOutOfRange(u8),

    #[error("update is for {update:?} but record belongs to {record:?}")]
    KeyMismatch {
        record: ProgressKey,
        update: ProgressKey,
    },
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Persisted progress of one learner through one experiment.
///
/// `current_step` is the 1-based count of steps reached. The UI works with a
/// 0-based index; conversions live in [`crate::steps`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub experiment_id: ExperimentId,
    pub current_step: u32,
    pub completed: bool,
    pub progress_percentage: u8,
    pub last_updated: DateTime<Utc>,
}

impl ProgressRecord {
    /// Build a fresh record from a partial update, defaulting omitted fields.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::PercentageOutOfRange` if the update carries a
    /// percentage above 100.
    pub fn create(update: ProgressUpdate, now: DateTime<Utc>) -> Result<Self, ProgressError> {
        update.validate()?;
        Ok(Self {
            user_id: update.user_id,
            experiment_id: update.experiment_id,
            current_step: update.current_step.unwrap_or(0),
            completed: update.completed.unwrap_or(false),
            progress_percentage: update.progress_percentage.unwrap_or(0),
            last_updated: now,
        })
    }

    /// Shallow-merge the supplied fields over this record.
    ///
    /// Fields omitted from `update` keep their prior values. `last_updated`
    /// is always stamped with `now`. No cross-field consistency is enforced.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::KeyMismatch` if the update targets another key,
    /// or `ProgressError::PercentageOutOfRange` for percentages above 100.
    pub fn merge(&mut self, update: &ProgressUpdate, now: DateTime<Utc>) -> Result<(), ProgressError> {
        update.validate()?;
        if update.key() != self.key() {
            return Err(ProgressError::KeyMismatch {
                record: self.key(),
                update: update.key(),
            });
        }

        if let Some(step) = update.current_step {
            self.current_step = step;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(percentage) = update.progress_percentage {
            self.progress_percentage = percentage;
        }
        self.last_updated = now;
        Ok(())
    }

    #[must_use]
    pub fn key(&self) -> ProgressKey {
        ProgressKey::new(self.user_id.clone(), self.experiment_id)
    }
}

//
// ─── UPDATE ────────────────────────────────────────────────────────────────────
//

/// Partial progress write. Only the key fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub user_id: UserId,
    pub experiment_id: ExperimentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<u8>,
}

impl ProgressUpdate {
    /// Creates an update that carries only the key.
    #[must_use]
    pub fn new(user_id: UserId, experiment_id: ExperimentId) -> Self {
        Self {
            user_id,
            experiment_id,
            current_step: None,
            completed: None,
            progress_percentage: None,
        }
    }

    #[must_use]
    pub fn with_current_step(mut self, step: u32) -> Self {
        self.current_step = Some(step);
        self
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    #[must_use]
    pub fn with_percentage(mut self, percentage: u8) -> Self {
        self.progress_percentage = Some(percentage);
        self
    }

    #[must_use]
    pub fn key(&self) -> ProgressKey {
        ProgressKey::new(self.user_id.clone(), self.experiment_id)
    }

    /// Check field ranges that a well-formed write must respect.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::PercentageOutOfRange` for percentages above 100.
    pub fn validate(&self) -> Result<(), ProgressError> {
        match self.progress_percentage {
            Some(p) if p > 100 => Err(ProgressError::PercentageOutOfRange(p)),
            _ => Ok(()),
        }
    }
}
