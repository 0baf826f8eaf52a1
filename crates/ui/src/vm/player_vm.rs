use lab_core::model::{Experiment, ExperimentId, ProgressRecord, ProgressUpdate, UserId};
use services::{CatalogService, CatalogServiceError, ProgressClient};

use crate::dispatch::CommitDispatcher;
use crate::state::ViewError;
use crate::vm::navigator_vm::{StepCommit, StepNavigator};

/// Display fields for the step on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepVm {
    pub position_label: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub temperature: Option<String>,
    pub safety: Option<String>,
}

/// Generic experiment player: one learner working through one experiment.
///
/// Transitions update the local step immediately and hand the commit to the
/// dispatcher; the UI never waits on the store.
pub struct ExperimentPlayerVm {
    experiment: Experiment,
    user_id: UserId,
    navigator: StepNavigator,
    completed: bool,
    commits: CommitDispatcher,
}

impl ExperimentPlayerVm {
    /// Build a player from an experiment and the learner's saved record, if any.
    #[must_use]
    pub fn new(
        experiment: Experiment,
        user_id: UserId,
        saved: Option<&ProgressRecord>,
        commits: CommitDispatcher,
    ) -> Self {
        let mut navigator = StepNavigator::new(experiment.total_steps(), experiment.navigation);
        let mut completed = false;
        if let Some(record) = saved {
            navigator.initialize(record.current_step);
            completed = record.completed;
        }
        Self {
            experiment,
            user_id,
            navigator,
            completed,
            commits,
        }
    }

    /// Fetch saved progress and build a player.
    ///
    /// A failed fetch is logged and the learner starts from the first step.
    pub async fn open(
        experiment: Experiment,
        user_id: UserId,
        client: &dyn ProgressClient,
        commits: CommitDispatcher,
    ) -> Self {
        let saved = match client.fetch_progress(&user_id, experiment.id).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(
                    user_id = %user_id,
                    experiment_id = %experiment.id,
                    error = %err,
                    "could not load saved progress; starting fresh"
                );
                None
            }
        };
        Self::new(experiment, user_id, saved.as_ref(), commits)
    }

    #[must_use]
    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    #[must_use]
    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.navigator.is_started()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.navigator.can_go_back()
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.navigator.can_go_forward()
    }

    pub fn start(&mut self) {
        self.navigator.start();
    }

    pub fn next(&mut self) -> bool {
        let commit = self.navigator.next();
        self.send(commit)
    }

    pub fn previous(&mut self) -> bool {
        let commit = self.navigator.previous();
        self.send(commit)
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        let commit = self.navigator.jump_to(index);
        self.send(commit)
    }

    pub fn mark_complete(&mut self) -> bool {
        let commit = self.navigator.mark_complete();
        self.send(commit)
    }

    /// Adopt a record fetched from the store; nothing is committed.
    pub fn reconcile(&mut self, record: &ProgressRecord) {
        if record.user_id != self.user_id || record.experiment_id != self.experiment.id {
            return;
        }
        self.navigator.reconcile(record);
        self.completed = record.completed;
    }

    #[must_use]
    pub fn current_step(&self) -> Option<StepVm> {
        let index = self.navigator.index();
        let step = self.experiment.step(index)?;
        Some(StepVm {
            position_label: format!("Step {} of {}", index + 1, self.navigator.total_steps()),
            title: step.title.clone(),
            description: step.description.clone(),
            duration: step.duration.clone(),
            temperature: step.temperature.clone(),
            safety: step.safety.clone(),
        })
    }

    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        if self.completed {
            100
        } else {
            self.navigator.percentage()
        }
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        if self.completed {
            "Completed".to_string()
        } else {
            format!("{}% complete", self.progress_percentage())
        }
    }

    fn send(&mut self, commit: Option<StepCommit>) -> bool {
        let Some(commit) = commit else {
            return false;
        };
        self.completed = commit.completed;
        self.commits.dispatch(
            ProgressUpdate::new(self.user_id.clone(), self.experiment.id)
                .with_current_step(commit.current_step)
                .with_completed(commit.completed)
                .with_percentage(commit.progress_percentage),
        );
        true
    }
}

/// Look up an experiment and open a player for it.
///
/// # Errors
///
/// Returns `ViewError::NotFound` when the catalog has no such experiment.
pub async fn open_experiment(
    catalog: &CatalogService,
    client: &dyn ProgressClient,
    commits: CommitDispatcher,
    user_id: UserId,
    experiment_id: ExperimentId,
) -> Result<ExperimentPlayerVm, ViewError> {
    let experiment = match catalog.get_experiment(experiment_id) {
        Ok(experiment) => experiment,
        Err(CatalogServiceError::NotFound(_)) => return Err(ViewError::NotFound),
        Err(_) => return Err(ViewError::Unknown),
    };
    Ok(ExperimentPlayerVm::open(experiment, user_id, client, commits).await)
}
