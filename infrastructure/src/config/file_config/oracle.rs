//! Oracle command from TOML (`[oracle]` section)
//!
//! ```toml
//! [oracle]
//! command = "llm"
//! args = ["--no-stream"]
//! timeout_secs = 300   # unset: no limit on a single call
//! ```

use serde::{Deserialize, Serialize};
use taskforce_domain::{ConfigIssue, ConfigIssueCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    /// Program consulted for every prompt; must be set before a run
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Hard limit enforced by the adapter itself, none when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: None,
        }
    }
}

impl FileOracleConfig {
    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if let Some(command) = &self.command
            && command.trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "oracle.command".to_string(),
                },
                "oracle.command is set but empty",
            ));
        }
        if self.timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "oracle.timeout_secs".to_string(),
                    value: "0".to_string(),
                    range: "1..".to_string(),
                },
                "oracle.timeout_secs must be at least 1",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_section() {
        let toml_str = r#"
[oracle]
command = "llm"
args = ["-m", "gpt-4o"]
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.oracle.command.as_deref(), Some("llm"));
        assert_eq!(config.oracle.args, vec!["-m", "gpt-4o"]);
        assert_eq!(config.oracle.timeout_secs, None);
        assert!(config.oracle.issues().is_empty());
    }

    #[test]
    fn test_blank_command_is_error() {
        let config = FileOracleConfig {
            command: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.issues()[0].is_error());
    }
}
