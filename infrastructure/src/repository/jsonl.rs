//! Append-only JSONL audit repository.
//!
//! Every repository call becomes one line. Lines carry a `record` field
//! naming their kind (`task_force`, `message`, `result`), the task force id
//! and a write `timestamp`:
//!
//! ```text
//! {"record":"task_force","task_force":"9f1c…","timestamp":"…","config":{…},"participants":[…]}
//! {"record":"message","task_force":"9f1c…","timestamp":"…","message":{…}}
//! {"record":"result","task_force":"9f1c…","timestamp":"…","result":{…}}
//! ```

use async_trait::async_trait;
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use taskforce_application::ports::repository::{RepositoryError, TaskForceRepository};
use taskforce_domain::{Message, Participant, TaskForceConfig, TaskForceId, TaskForceResult};

/// JSONL audit file shared by all task forces of a process.
pub struct JsonlTaskForceRepository {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTaskForceRepository {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::Io(format!("create {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| RepositoryError::Io(format!("open {}: {}", path.display(), e)))?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &str, id: &TaskForceId, body: Value) -> Result<(), RepositoryError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut line = json!({
            "record": record,
            "task_force": id,
            "timestamp": timestamp,
        });
        if let (Value::Object(line), Value::Object(body)) = (&mut line, body) {
            line.extend(body);
        }

        let line = serde_json::to_string(&line)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| RepositoryError::Io(format!("write {}: {}", self.path.display(), e)))
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RepositoryError> {
    serde_json::to_value(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

#[async_trait]
impl TaskForceRepository for JsonlTaskForceRepository {
    async fn save_task_force(
        &self,
        id: &TaskForceId,
        config: &TaskForceConfig,
        participants: &[Participant],
    ) -> Result<(), RepositoryError> {
        self.append(
            "task_force",
            id,
            json!({
                "config": to_value(config)?,
                "participants": to_value(&participants)?,
            }),
        )
    }

    async fn append_message(
        &self,
        id: &TaskForceId,
        message: &Message,
    ) -> Result<(), RepositoryError> {
        self.append("message", id, json!({ "message": to_value(message)? }))
    }

    async fn save_result(
        &self,
        id: &TaskForceId,
        result: &TaskForceResult,
    ) -> Result<(), RepositoryError> {
        self.append("result", id, json!({ "result": to_value(result)? }))
    }
}
