use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a progress key component is malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KeyError {
    #[error("user id cannot be empty")]
    EmptyUserId,

    #[error("user id {raw:?} is a reserved path segment")]
    ReservedUserId { raw: String },

    #[error("experiment id must be a positive integer")]
    NonPositiveExperimentId,

    #[error("failed to parse experiment id from {raw:?}")]
    InvalidExperimentId { raw: String },
}

/// Opaque identifier for a learner.
///
/// Assigned by the client (typically generated once per browser and cached).
/// Never empty; construction trims nothing and rejects whitespace-only input.
/// `.` and `..` are rejected because URLs collapse them as path segments.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a `UserId` from a raw string.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::EmptyUserId` if the value is empty or whitespace,
    /// and `KeyError::ReservedUserId` for `.` or `..`.
    pub fn new(raw: impl Into<String>) -> Result<Self, KeyError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(KeyError::EmptyUserId);
        }
        if raw == "." || raw == ".." {
            return Err(KeyError::ReservedUserId { raw });
        }
        Ok(Self(raw))
    }

    /// Generates a fresh random identifier for a new browser profile.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Unique identifier for an Experiment in the catalog.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ExperimentId(u64);

impl ExperimentId {
    /// Creates a new `ExperimentId`.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NonPositiveExperimentId` for zero.
    pub fn new(id: u64) -> Result<Self, KeyError> {
        if id == 0 {
            return Err(KeyError::NonPositiveExperimentId);
        }
        Ok(Self(id))
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for ExperimentId {
    type Error = KeyError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExperimentId> for u64 {
    fn from(value: ExperimentId) -> Self {
        value.0
    }
}

/// Composite `(user, experiment)` key for a progress record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub user_id: UserId,
    pub experiment_id: ExperimentId,
}

impl ProgressKey {
    #[must_use]
    pub fn new(user_id: UserId, experiment_id: ExperimentId) -> Self {
        Self {
            user_id,
            experiment_id,
        }
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Debug for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExperimentId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

impl FromStr for UserId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for ExperimentId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s.parse::<u64>().map_err(|_| KeyError::InvalidExperimentId {
            raw: s.to_string(),
        })?;
        Self::new(parsed)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
