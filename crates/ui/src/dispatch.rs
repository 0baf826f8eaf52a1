use std::sync::Arc;
use std::time::Duration;

use lab_core::model::ProgressUpdate;
use services::ProgressClient;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Fire-and-forget channel for progress commits.
///
/// Commits are delivered in dispatch order by a single background task, so
/// the store sees last-write-wins. A commit that still fails after
/// `max_attempts` is logged and dropped; the player keeps its local state.
#[derive(Clone)]
pub struct CommitDispatcher {
    tx: mpsc::UnboundedSender<ProgressUpdate>,
}

impl CommitDispatcher {
    /// Spawn the delivery task with a single attempt per commit.
    ///
    /// Must be called from within a tokio runtime. The task ends once every
    /// `CommitDispatcher` clone has been dropped and the queue is drained.
    #[must_use]
    pub fn spawn(client: Arc<dyn ProgressClient>) -> (Self, JoinHandle<()>) {
        Self::spawn_with_attempts(client, 1)
    }

    /// Spawn the delivery task, retrying failed commits up to `max_attempts` times.
    #[must_use]
    pub fn spawn_with_attempts(
        client: Arc<dyn ProgressClient>,
        max_attempts: u32,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(deliver(client, rx, max_attempts.max(1)));
        (Self { tx }, handle)
    }

    /// Queue a commit without waiting for it to be stored.
    pub fn dispatch(&self, update: ProgressUpdate) {
        if let Err(err) = self.tx.send(update) {
            tracing::warn!(
                user_id = %err.0.user_id,
                experiment_id = %err.0.experiment_id,
                "commit worker stopped; progress not sent"
            );
        }
    }
}

async fn deliver(
    client: Arc<dyn ProgressClient>,
    mut rx: mpsc::UnboundedReceiver<ProgressUpdate>,
    max_attempts: u32,
) {
    while let Some(update) = rx.recv().await {
        for attempt in 1..=max_attempts {
            match client.save_progress(update.clone()).await {
                Ok(record) => {
                    tracing::debug!(
                        user_id = %record.user_id,
                        experiment_id = %record.experiment_id,
                        current_step = record.current_step,
                        "progress committed"
                    );
                    break;
                }
                Err(err) if attempt < max_attempts => {
                    tracing::debug!(attempt, error = %err, "progress commit failed; retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(err) => {
                    tracing::warn!(
                        user_id = %update.user_id,
                        experiment_id = %update.experiment_id,
                        error = %err,
                        "progress commit dropped"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use lab_core::model::{ExperimentId, ProgressRecord, UserId};
    use lab_core::time::fixed_now;
    use services::ClientError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Records saves; fails the first `failures` calls.
    #[derive(Default)]
    struct FlakyClient {
        failures: AtomicU32,
        saved: Mutex<Vec<ProgressUpdate>>,
    }

    impl FlakyClient {
        fn failing(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                saved: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProgressClient for FlakyClient {
        async fn fetch_progress(
            &self,
            _user_id: &UserId,
            _experiment_id: ExperimentId,
        ) -> Result<Option<ProgressRecord>, ClientError> {
            Ok(None)
        }

        async fn save_progress(&self, update: ProgressUpdate) -> Result<ProgressRecord, ClientError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(ClientError::InvalidBaseUrl("offline".into()));
            }
            self.saved.lock().unwrap().push(update.clone());
            Ok(ProgressRecord {
                user_id: update.user_id,
                experiment_id: update.experiment_id,
                current_step: update.current_step.unwrap_or(0),
                completed: update.completed.unwrap_or(false),
                progress_percentage: update.progress_percentage.unwrap_or(0),
                last_updated: fixed_now(),
            })
        }
    }

    fn update(step: u32) -> ProgressUpdate {
        ProgressUpdate::new(UserId::new("u1").unwrap(), ExperimentId::new(1).unwrap())
            .with_current_step(step)
    }

    #[tokio::test]
    async fn delivers_in_dispatch_order() {
        let client = Arc::new(FlakyClient::default());
        let (dispatcher, handle) = CommitDispatcher::spawn(client.clone());

        for step in 1..=3 {
            dispatcher.dispatch(update(step));
        }
        drop(dispatcher);
        handle.await.unwrap();

        let steps: Vec<_> = client
            .saved
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.current_step)
            .collect();
        assert_eq!(steps, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn failed_commit_is_dropped_and_queue_continues() {
        let client = Arc::new(FlakyClient::failing(1));
        let (dispatcher, handle) = CommitDispatcher::spawn(client.clone());

        dispatcher.dispatch(update(1));
        dispatcher.dispatch(update(2));
        drop(dispatcher);
        handle.await.unwrap();

        let saved = client.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].current_step, Some(2));
    }

    #[tokio::test]
    async fn retries_when_configured() {
        let client = Arc::new(FlakyClient::failing(2));
        let (dispatcher, handle) = CommitDispatcher::spawn_with_attempts(client.clone(), 3);

        dispatcher.dispatch(update(4));
        drop(dispatcher);
        handle.await.unwrap();

        let saved = client.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].current_step, Some(4));
    }
}
