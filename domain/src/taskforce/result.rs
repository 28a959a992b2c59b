//! Task force execution result

use super::participant::{ParticipantId, TaskForceId};
use super::status::TaskForceStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Why the refinement loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    ConsensusReached,
    RoundLimitReached,
    TimedOut,
}

impl StopReason {
    /// Lifecycle state this stop reason moves the task force into.
    pub fn status(&self) -> TaskForceStatus {
        match self {
            StopReason::ConsensusReached => TaskForceStatus::ConsensusReached,
            StopReason::RoundLimitReached => TaskForceStatus::RoundLimitReached,
            StopReason::TimedOut => TaskForceStatus::TimedOut,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StopReason::ConsensusReached => "Consensus reached",
            StopReason::RoundLimitReached => "Round limit reached",
            StopReason::TimedOut => "Timed out",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Outcome of one completed task force execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskForceResult {
    pub task_force_id: TaskForceId,
    /// `true` iff the final consensus score met the threshold
    pub success: bool,
    /// Synthesized answer
    pub solution: String,
    pub consensus_score: f64,
    pub stop_reason: StopReason,
    pub participants: Vec<ParticipantId>,
    pub message_count: usize,
    pub rounds_completed: usize,
    #[serde(rename = "execution_time_ms", with = "duration_millis")]
    pub execution_time: Duration,
    /// Each participant's round-1 contribution, for traceability
    pub first_round_contributions: BTreeMap<ParticipantId, String>,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
