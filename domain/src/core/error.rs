//! Domain error types

use crate::taskforce::status::TaskForceStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Task force capacity exceeded: {requested} participants requested, at most {max} allowed")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("Insufficient participants: {count} given, at least 2 required")]
    InsufficientParticipants { count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Message for round {round} appended after round {last}")]
    OutOfOrderMessage { round: usize, last: usize },

    #[error("Message belongs to task force {message} but the log is for {log}")]
    ForeignMessage { message: String, log: String },

    #[error("Illegal task force transition: {from} -> {to}")]
    IllegalTransition {
        from: TaskForceStatus,
        to: TaskForceStatus,
    },
}

impl DomainError {
    /// Check if this error was raised while validating a configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::CapacityExceeded { .. }
                | DomainError::InsufficientParticipants { .. }
                | DomainError::InvalidConfig(_)
        )
    }
}
