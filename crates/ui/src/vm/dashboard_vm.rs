use lab_core::model::{ExperimentId, ProgressRecord};
use services::ExperimentSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardCardVm {
    pub id: ExperimentId,
    pub title: String,
    pub category_label: String,
    pub duration_label: String,
    pub steps_label: String,
    pub percentage: u8,
    pub percentage_label: String,
    pub status: ProgressStatus,
}

/// One card per catalog experiment, joined with the learner's records.
#[must_use]
pub fn map_dashboard_cards(
    experiments: &[ExperimentSummary],
    records: &[ProgressRecord],
) -> Vec<DashboardCardVm> {
    experiments
        .iter()
        .map(|experiment| {
            let record = records.iter().find(|r| r.experiment_id == experiment.id);
            let (status, percentage) = match record {
                Some(r) if r.completed => (ProgressStatus::Completed, 100),
                Some(r) if r.current_step > 0 => {
                    (ProgressStatus::InProgress, r.progress_percentage.min(100))
                }
                _ => (ProgressStatus::NotStarted, 0),
            };

            let steps_label = match experiment.step_count {
                1 => "1 step".to_string(),
                n => format!("{n} steps"),
            };

            DashboardCardVm {
                id: experiment.id,
                title: experiment.title.clone(),
                category_label: experiment.category.to_string(),
                duration_label: experiment.duration.clone(),
                steps_label,
                percentage,
                percentage_label: format!("{percentage}%"),
                status,
            }
        })
        .collect()
}
