//! Message entities

use crate::taskforce::participant::{Participant, ParticipantId, TaskForceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a message is within the discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Initial answer given in round 1
    Contribution,
    /// Answer given in round 2 or later, reacting to the discussion
    Refinement,
}

impl MessageKind {
    /// Kind of the messages gathered in `round` (1-indexed).
    pub fn for_round(round: usize) -> Self {
        if round <= 1 {
            MessageKind::Contribution
        } else {
            MessageKind::Refinement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Contribution => "contribution",
            MessageKind::Refinement => "refinement",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One participant's message in one round. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub task_force_id: TaskForceId,
    pub participant_id: ParticipantId,
    pub participant_label: String,
    pub content: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
    /// Round number (1-indexed)
    pub round: usize,
}

impl Message {
    /// Create a message for `round`, deriving its kind from the round number.
    pub fn new(
        task_force_id: TaskForceId,
        participant: &Participant,
        content: impl Into<String>,
        round: usize,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task_force_id,
            participant_id: participant.id.clone(),
            participant_label: participant.label.clone(),
            content: content.into(),
            kind: MessageKind::for_round(round),
            timestamp: Utc::now(),
            round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_round() {
        assert_eq!(MessageKind::for_round(1), MessageKind::Contribution);
        assert_eq!(MessageKind::for_round(2), MessageKind::Refinement);
        assert_eq!(MessageKind::for_round(7), MessageKind::Refinement);
    }

    #[test]
    fn test_new_message_copies_participant() {
        let participant = Participant::new("a1", "Architect");
        let msg = Message::new(TaskForceId::new("tf"), &participant, "Use Raft", 2);

        assert_eq!(msg.participant_id.as_str(), "a1");
        assert_eq!(msg.participant_label, "Architect");
        assert_eq!(msg.kind, MessageKind::Refinement);
        assert!(!msg.id.is_empty());
    }
}
