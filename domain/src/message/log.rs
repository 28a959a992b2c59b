//! Append-only message log for one task force

use super::entities::{Message, MessageKind};
use crate::core::error::DomainError;
use crate::taskforce::participant::{ParticipantId, TaskForceId};
use std::collections::BTreeMap;

/// Ordered record of every message of one task force execution.
///
/// Messages are only ever appended. Round numbers start at 1 and never
/// decrease; an append that would break either rule is rejected and leaves
/// the log untouched.
#[derive(Debug, Clone)]
pub struct MessageLog {
    task_force_id: TaskForceId,
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new(task_force_id: TaskForceId) -> Self {
        Self {
            task_force_id,
            messages: Vec::new(),
        }
    }

    pub fn task_force_id(&self) -> &TaskForceId {
        &self.task_force_id
    }

    pub fn append(&mut self, message: Message) -> Result<(), DomainError> {
        if message.task_force_id != self.task_force_id {
            return Err(DomainError::ForeignMessage {
                message: message.task_force_id.to_string(),
                log: self.task_force_id.to_string(),
            });
        }
        let last = self.last_round();
        if message.round == 0 || message.round < last {
            return Err(DomainError::OutOfOrderMessage {
                round: message.round,
                last,
            });
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The `n` most recent messages, oldest first.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Highest round recorded so far, 0 when empty.
    pub fn last_round(&self) -> usize {
        self.messages.last().map(|m| m.round).unwrap_or(0)
    }

    /// Each participant's round-1 contribution.
    pub fn first_round_contributions(&self) -> BTreeMap<ParticipantId, String> {
        self.messages
            .iter()
            .filter(|m| m.kind == MessageKind::Contribution)
            .map(|m| (m.participant_id.clone(), m.content.clone()))
            .collect()
    }
}
