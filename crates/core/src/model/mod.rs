mod experiment;
mod ids;
mod progress;

pub use experiment::{Experiment, ExperimentCategory, NavigationPolicy, StepDetail};
pub use ids::{ExperimentId, KeyError, ProgressKey, UserId};
pub use progress::{ProgressError, ProgressRecord, ProgressUpdate};
