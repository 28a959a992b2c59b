//! Task force identity value objects

use serde::{Deserialize, Serialize};

/// Identifier of a created task force
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskForceId(String);

impl TaskForceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskForceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque agent identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A participating agent: identifier plus display label.
///
/// The engine never inspects a participant beyond these two fields;
/// participants are interchangeable consultation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub label: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            label: label.into(),
        }
    }

    /// Participant whose label is its identifier.
    pub fn unlabeled(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id: ParticipantId::new(id),
        }
    }
}

impl std::str::FromStr for Participant {
    type Err = std::convert::Infallible;

    /// Parses `id` or `id=label`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((id, label)) if !label.trim().is_empty() => {
                Ok(Participant::new(id.trim(), label.trim()))
            }
            Some((id, _)) => Ok(Participant::unlabeled(id.trim())),
            None => Ok(Participant::unlabeled(s.trim())),
        }
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.label == self.id.as_str() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.label, self.id)
        }
    }
}
