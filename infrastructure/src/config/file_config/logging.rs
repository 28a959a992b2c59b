//! Log destinations from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! conversation_log = "runs/latest.jsonl"   # JSONL transcript of the run
//! dir = "~/.local/state/taskforce/logs"    # daily-rolling diagnostic log files
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub conversation_log: Option<PathBuf>,
    pub dir: Option<PathBuf>,
}
