use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::ExperimentId;

/// How a learner may move backwards through an experiment's steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPolicy {
    /// Steps can be revisited freely.
    #[default]
    Reversible,
    /// Procedure is one-way: once reagents are added there is no undo.
    Linear,
}

impl NavigationPolicy {
    #[must_use]
    pub fn allows_backward(self) -> bool {
        matches!(self, Self::Reversible)
    }
}

/// Broad grouping used by the catalog and dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentCategory {
    Titration,
    Equilibrium,
    Qualitative,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for ExperimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Titration => f.write_str("Titration"),
            Self::Equilibrium => f.write_str("Equilibrium"),
            Self::Qualitative => f.write_str("Qualitative Analysis"),
            Self::Other(label) => f.write_str(label),
        }
    }
}

/// One step of a lab procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDetail {
    pub title: String,
    pub description: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<String>,
}

/// A guided experiment as served by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: ExperimentId,
    pub title: String,
    pub category: ExperimentCategory,
    pub duration: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub safety_info: Vec<String>,
    #[serde(default)]
    pub steps: Vec<StepDetail>,
    #[serde(default)]
    pub navigation: NavigationPolicy,
}

impl Experiment {
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&StepDetail> {
        self.steps.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_experiment_with_defaults() {
        let json = r#"{
            "id": 3,
            "title": "Flame Test",
            "category": "qualitative",
            "duration": "20 min"
        }"#;
        let experiment: Experiment = serde_json::from_str(json).unwrap();

        assert_eq!(experiment.total_steps(), 0);
        assert_eq!(experiment.navigation, NavigationPolicy::Reversible);
        assert_eq!(experiment.category, ExperimentCategory::Qualitative);
        assert!(experiment.step(0).is_none());
    }

    #[test]
    fn keeps_unknown_category_label() {
        let category: ExperimentCategory = serde_json::from_str("\"electrochemistry\"").unwrap();
        assert_eq!(category, ExperimentCategory::Other("electrochemistry".into()));
        assert_eq!(category.to_string(), "electrochemistry");
    }

    #[test]
    fn linear_policy_blocks_backward() {
        let policy: NavigationPolicy = serde_json::from_str("\"linear\"").unwrap();
        assert!(!policy.allows_backward());
        assert!(NavigationPolicy::Reversible.allows_backward());
    }
}
