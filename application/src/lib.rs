//! Application layer for taskforce
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, PartialFailurePolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    oracle::{ConsultOptions, OracleError, OracleTier, ReasoningOracle},
    progress::{NoProgress, ProgressNotifier},
    repository::{NoPersistence, RepositoryError, TaskForceRepository},
};
pub use use_cases::error::TaskForceError;
pub use use_cases::orchestrator::TaskForceOrchestrator;
