use std::sync::Arc;

use lab_core::model::{ExperimentId, ProgressKey, ProgressRecord, ProgressUpdate, UserId};
use storage::repository::ProgressRepository;

use crate::error::ProgressServiceError;
use crate::Clock;

/// Reads and writes learner progress, stamping writes with the service clock.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Fetch one learner's progress on one experiment.
    ///
    /// Returns `Ok(None)` when nothing has been committed yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn get_progress(
        &self,
        user_id: &UserId,
        experiment_id: ExperimentId,
    ) -> Result<Option<ProgressRecord>, ProgressServiceError> {
        let key = ProgressKey::new(user_id.clone(), experiment_id);
        Ok(self.progress.get_progress(&key).await?)
    }

    /// List every experiment the learner has progress on.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn list_progress(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ProgressServiceError> {
        Ok(self.progress.list_progress(user_id).await?)
    }

    /// Upsert a partial progress record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` for out-of-range fields.
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn save_progress(
        &self,
        update: ProgressUpdate,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        update.validate()?;
        let record = self.progress.upsert_progress(update, self.clock.now()).await?;
        tracing::debug!(
            user_id = %record.user_id,
            experiment_id = %record.experiment_id,
            current_step = record.current_step,
            completed = record.completed,
            "progress saved"
        );
        Ok(record)
    }
}
