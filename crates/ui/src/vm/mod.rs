mod dashboard_vm;
mod navigator_vm;
mod player_vm;
mod titration_vm;

pub use dashboard_vm::{DashboardCardVm, ProgressStatus, map_dashboard_cards};
pub use navigator_vm::{StepCommit, StepNavigator};
pub use player_vm::{ExperimentPlayerVm, StepVm, open_experiment};
pub use titration_vm::{TitrationInputVm, TitrationResultVm, compute_titration, map_titration_result};
