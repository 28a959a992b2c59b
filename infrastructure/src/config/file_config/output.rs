//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use taskforce_domain::OutputFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Result format; the CLI default applies when unset
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}
