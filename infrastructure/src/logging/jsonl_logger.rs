//! JSONL transcript writer for conversation events.
//!
//! Every [`ConversationEvent`] becomes one line: the event payload with a
//! `type` and an RFC3339 `timestamp` merged in. Non-object payloads are
//! nested under `data`.

use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use taskforce_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use tracing::warn;

/// Transcript of one CLI run, one JSON object per line.
///
/// Each line is flushed as it is written so an interrupted run still leaves
/// a readable transcript.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create (or truncate) the transcript at `path`.
    ///
    /// Returns `None` after logging a warning when the file cannot be
    /// created; a run without a transcript is still a valid run.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Cannot create transcript directory {}: {}", parent.display(), e);
            return None;
        }

        match File::create(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Cannot create transcript {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn to_record(event: ConversationEvent, timestamp: String) -> Value {
    match event.payload {
        Value::Object(mut map) => {
            map.insert("type".to_string(), Value::from(event.event_type));
            map.insert("timestamp".to_string(), Value::from(timestamp));
            Value::Object(map)
        }
        other => json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let line = match serde_json::to_string(&to_record(event, timestamp)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Cannot serialize conversation event: {}", e);
                return;
            }
        };

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("Failed to write conversation event to {}: {}", self.path.display(), e);
        }
    }
}
