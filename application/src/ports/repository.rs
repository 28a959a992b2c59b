//! Task force repository port
//!
//! Persistence of task force records, messages and results for later audit.
//! Every call is best-effort from the engine's point of view: a failure is
//! logged by the caller and never rolls back in-memory orchestration state.

use async_trait::async_trait;
use taskforce_domain::{Message, Participant, TaskForceConfig, TaskForceId, TaskForceResult};
use thiserror::Error;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Repository error: {0}")]
    Other(String),
}

/// Durable store for task force audit records
#[async_trait]
pub trait TaskForceRepository: Send + Sync {
    /// Record a newly created task force
    async fn save_task_force(
        &self,
        id: &TaskForceId,
        config: &TaskForceConfig,
        participants: &[Participant],
    ) -> Result<(), RepositoryError>;

    /// Append one message to the task force's stored log
    async fn append_message(
        &self,
        id: &TaskForceId,
        message: &Message,
    ) -> Result<(), RepositoryError>;

    /// Record the result of a completed execution
    async fn save_result(
        &self,
        id: &TaskForceId,
        result: &TaskForceResult,
    ) -> Result<(), RepositoryError>;
}

/// No-op repository for when persistence is disabled
pub struct NoPersistence;

#[async_trait]
impl TaskForceRepository for NoPersistence {
    async fn save_task_force(
        &self,
        _id: &TaskForceId,
        _config: &TaskForceConfig,
        _participants: &[Participant],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn append_message(
        &self,
        _id: &TaskForceId,
        _message: &Message,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn save_result(
        &self,
        _id: &TaskForceId,
        _result: &TaskForceResult,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }
}
