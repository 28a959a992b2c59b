//! Errors surfaced by the task force use cases

use taskforce_domain::{DomainError, TaskForceId};
use thiserror::Error;

/// Errors that can occur while creating or executing a task force
///
/// Configuration errors reject `create` outright; lifecycle errors reject
/// `execute` without side effects; the remaining variants are fatal outcomes
/// of an execution that leave the task force `Failed`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskForceError {
    #[error("Capacity exceeded: {requested} participants, max_agents is {max}")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("Insufficient participants: {count} given, at least 2 required")]
    InsufficientParticipants { count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown task force: {0}")]
    UnknownTaskForce(TaskForceId),

    #[error("Task force {0} is already running")]
    AlreadyRunning(TaskForceId),

    #[error("Round {round} failed: no participant produced a contribution")]
    RoundGatherFailed { round: usize },

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl TaskForceError {
    /// Whether this error ended a running execution (as opposed to rejecting a call).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TaskForceError::RoundGatherFailed { .. }
                | TaskForceError::SynthesisFailed(_)
                | TaskForceError::ExecutionFailed(_)
        )
    }
}

impl From<DomainError> for TaskForceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::CapacityExceeded { requested, max } => {
                TaskForceError::CapacityExceeded { requested, max }
            }
            DomainError::InsufficientParticipants { count } => {
                TaskForceError::InsufficientParticipants { count }
            }
            DomainError::InvalidConfig(msg) => TaskForceError::InvalidConfig(msg),
            other => TaskForceError::ExecutionFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforce_domain::TaskForceStatus;

    #[test]
    fn test_domain_configuration_errors_keep_their_kind() {
        let err: TaskForceError = DomainError::CapacityExceeded {
            requested: 3,
            max: 2,
        }
        .into();
        assert_eq!(
            err,
            TaskForceError::CapacityExceeded {
                requested: 3,
                max: 2
            }
        );
    }

    #[test]
    fn test_other_domain_errors_become_execution_failures() {
        let err: TaskForceError = DomainError::IllegalTransition {
            from: TaskForceStatus::Completed,
            to: TaskForceStatus::Running,
        }
        .into();
        assert!(matches!(err, TaskForceError::ExecutionFailed(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_lifecycle_errors_are_not_fatal() {
        assert!(!TaskForceError::AlreadyRunning(TaskForceId::new("x")).is_fatal());
        assert!(!TaskForceError::UnknownTaskForce(TaskForceId::new("x")).is_fatal());
    }
}
