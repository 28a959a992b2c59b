//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout one-to-one. Enum-like fields
//! stay strings here and are parsed with a warning fallback, so a typo never
//! prevents the file from loading.

mod execution;
mod logging;
mod oracle;
mod output;
mod persistence;
mod taskforce;

pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use oracle::FileOracleConfig;
pub use output::FileOutputConfig;
pub use persistence::{FilePersistenceConfig, PersistenceBackend};
pub use taskforce::FileTaskForceConfig;

use serde::{Deserialize, Serialize};
use taskforce_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Defaults for new task forces
    pub taskforce: FileTaskForceConfig,
    /// Orchestration tuning
    pub execution: FileExecutionConfig,
    /// External oracle command
    pub oracle: FileOracleConfig,
    /// Audit record storage
    pub persistence: FilePersistenceConfig,
    /// Transcript and diagnostic log destinations
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Nothing here fails: callers print warnings and refuse to run on
    /// errors.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.taskforce.parse_kind().1);
        issues.extend(self.taskforce.range_issues());

        issues.extend(self.execution.parse_failure_policy().1);
        issues.extend(self.execution.range_issues());

        issues.extend(self.oracle.issues());
        issues.extend(self.persistence.parse_backend().1);

        issues
    }
}
