//! Shared utilities for use cases.
//!
//! [`RunRecorder`] appends gathered messages to the in-memory log and mirrors
//! them to the repository and conversation log. Persistence is best-effort:
//! failures are logged and never affect the in-memory state.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::oracle::{ConsultOptions, OracleError, ReasoningOracle};
use crate::ports::repository::TaskForceRepository;
use crate::use_cases::error::TaskForceError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskforce_domain::{
    Message, MessageLog, Participant, TaskForceConfig, TaskForceId, TaskForceResult,
};
use tracing::warn;

/// Consult the oracle, bounded by `limit` when one is set.
pub(crate) async fn consult_within<O: ReasoningOracle + ?Sized>(
    oracle: &O,
    prompt: &str,
    options: &ConsultOptions,
    limit: Option<Duration>,
) -> Result<String, OracleError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, oracle.consult(prompt, options))
            .await
            .unwrap_or(Err(OracleError::Timeout)),
        None => oracle.consult(prompt, options).await,
    }
}

pub struct RunRecorder {
    repository: Arc<dyn TaskForceRepository>,
    logger: Arc<dyn ConversationLogger>,
}

impl RunRecorder {
    pub fn new(
        repository: Arc<dyn TaskForceRepository>,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self { repository, logger }
    }

    pub fn event(&self, event_type: &'static str, payload: serde_json::Value) {
        self.logger.log(ConversationEvent::new(event_type, payload));
    }

    /// Append one round's batch to the log, then persist each message.
    pub async fn append_round(
        &self,
        log: &mut MessageLog,
        messages: Vec<Message>,
    ) -> Result<(), TaskForceError> {
        for message in messages {
            log.append(message.clone())?;

            self.event(
                "contribution",
                json!({
                    "task_force": message.task_force_id,
                    "round": message.round,
                    "kind": message.kind,
                    "participant": message.participant_id,
                    "text": message.content,
                }),
            );

            if let Err(e) = self
                .repository
                .append_message(&message.task_force_id, &message)
                .await
            {
                warn!(
                    task_force = %message.task_force_id,
                    message = %message.id,
                    "Failed to persist message: {}",
                    e
                );
            }
        }
        Ok(())
    }

    pub async fn save_task_force(
        &self,
        id: &TaskForceId,
        config: &TaskForceConfig,
        participants: &[Participant],
    ) {
        if let Err(e) = self
            .repository
            .save_task_force(id, config, participants)
            .await
        {
            warn!(task_force = %id, "Failed to persist task force: {}", e);
        }
    }

    pub async fn save_result(&self, id: &TaskForceId, result: &TaskForceResult) {
        if let Err(e) = self.repository.save_result(id, result).await {
            warn!(task_force = %id, "Failed to persist result: {}", e);
        }
    }
}
