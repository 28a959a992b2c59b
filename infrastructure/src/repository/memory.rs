//! In-memory task force repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use taskforce_application::ports::repository::{RepositoryError, TaskForceRepository};
use taskforce_domain::{Message, Participant, TaskForceConfig, TaskForceId, TaskForceResult};

/// Everything recorded for one task force
#[derive(Debug, Clone)]
pub struct StoredTaskForce {
    pub config: TaskForceConfig,
    pub participants: Vec<Participant>,
    /// Messages of every execution, in append order
    pub messages: Vec<Message>,
    /// One entry per completed execution
    pub results: Vec<TaskForceResult>,
}

/// Repository keeping records in process memory
#[derive(Default)]
pub struct InMemoryTaskForceRepository {
    records: Mutex<HashMap<TaskForceId, StoredTaskForce>>,
}

impl InMemoryTaskForceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<TaskForceId, StoredTaskForce>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: &TaskForceId) -> Option<StoredTaskForce> {
        self.records().get(id).cloned()
    }

    pub fn messages(&self, id: &TaskForceId) -> Vec<Message> {
        self.records()
            .get(id)
            .map(|record| record.messages.clone())
            .unwrap_or_default()
    }

    pub fn latest_result(&self, id: &TaskForceId) -> Option<TaskForceResult> {
        self.records()
            .get(id)
            .and_then(|record| record.results.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

fn unknown(id: &TaskForceId) -> RepositoryError {
    RepositoryError::Other(format!("task force {} was never saved", id))
}

#[async_trait]
impl TaskForceRepository for InMemoryTaskForceRepository {
    async fn save_task_force(
        &self,
        id: &TaskForceId,
        config: &TaskForceConfig,
        participants: &[Participant],
    ) -> Result<(), RepositoryError> {
        self.records().insert(
            id.clone(),
            StoredTaskForce {
                config: config.clone(),
                participants: participants.to_vec(),
                messages: Vec::new(),
                results: Vec::new(),
            },
        );
        Ok(())
    }

    async fn append_message(
        &self,
        id: &TaskForceId,
        message: &Message,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records();
        let record = records.get_mut(id).ok_or_else(|| unknown(id))?;
        record.messages.push(message.clone());
        Ok(())
    }

    async fn save_result(
        &self,
        id: &TaskForceId,
        result: &TaskForceResult,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records();
        let record = records.get_mut(id).ok_or_else(|| unknown(id))?;
        record.results.push(result.clone());
        Ok(())
    }
}
