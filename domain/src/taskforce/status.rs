//! Task force lifecycle state machine
//!
//! ```text
//! Created ──▶ Running ──┬──▶ ConsensusReached ──┐
//!                       ├──▶ RoundLimitReached ─┼──▶ Synthesizing ──▶ Completed
//!                       ├──▶ TimedOut ──────────┘          │
//!                       └──▶ Failed ◀──────────────────────┘
//! ```
//!
//! `Completed` and `Failed` are terminal.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle state of one task force execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskForceStatus {
    Created,
    Running,
    ConsensusReached,
    RoundLimitReached,
    TimedOut,
    Synthesizing,
    Completed,
    Failed,
}

impl TaskForceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskForceStatus::Created => "created",
            TaskForceStatus::Running => "running",
            TaskForceStatus::ConsensusReached => "consensus_reached",
            TaskForceStatus::RoundLimitReached => "round_limit_reached",
            TaskForceStatus::TimedOut => "timed_out",
            TaskForceStatus::Synthesizing => "synthesizing",
            TaskForceStatus::Completed => "completed",
            TaskForceStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskForceStatus::Completed | TaskForceStatus::Failed)
    }

    /// Whether `self -> to` is an edge of the lifecycle graph.
    pub fn can_transition_to(&self, to: TaskForceStatus) -> bool {
        use TaskForceStatus::*;
        matches!(
            (self, to),
            (Created, Running)
                | (Running, ConsensusReached)
                | (Running, RoundLimitReached)
                | (Running, TimedOut)
                | (Running, Failed)
                | (ConsensusReached, Synthesizing)
                | (RoundLimitReached, Synthesizing)
                | (TimedOut, Synthesizing)
                | (Synthesizing, Completed)
                | (Synthesizing, Failed)
        )
    }

    /// Move to `to`, rejecting any edge not in the lifecycle graph.
    pub fn transition(&mut self, to: TaskForceStatus) -> Result<(), DomainError> {
        if !self.can_transition_to(to) {
            return Err(DomainError::IllegalTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

impl std::fmt::Display for TaskForceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
