//! Audit persistence from TOML (`[persistence]` section)
//!
//! ```toml
//! [persistence]
//! backend = "jsonl"           # or "memory"
//! path = "~/.local/share/taskforce/audit.jsonl"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use taskforce_domain::{ConfigIssue, ConfigIssueCode};

/// Where task force records go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceBackend {
    #[default]
    Memory,
    Jsonl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersistenceConfig {
    pub backend: String,
    /// Audit file for the `jsonl` backend
    pub path: Option<PathBuf>,
}

impl Default for FilePersistenceConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            path: None,
        }
    }
}

impl FilePersistenceConfig {
    pub fn parse_backend(&self) -> (PersistenceBackend, Vec<ConfigIssue>) {
        match self.backend.to_lowercase().as_str() {
            "memory" => (PersistenceBackend::Memory, vec![]),
            "jsonl" if self.path.is_some() => (PersistenceBackend::Jsonl, vec![]),
            "jsonl" => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::MissingValue {
                        field: "persistence.path".to_string(),
                    },
                    "persistence.backend = \"jsonl\" requires persistence.path",
                );
                (PersistenceBackend::Jsonl, vec![issue])
            }
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "persistence.backend".to_string(),
                        value: self.backend.clone(),
                        valid_values: vec!["memory".to_string(), "jsonl".to_string()],
                    },
                    format!(
                        "persistence.backend: unknown value '{}', falling back to 'memory'",
                        self.backend
                    ),
                );
                (PersistenceBackend::Memory, vec![issue])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_memory() {
        let (backend, issues) = FilePersistenceConfig::default().parse_backend();
        assert_eq!(backend, PersistenceBackend::Memory);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_jsonl_requires_path() {
        let config = FilePersistenceConfig {
            backend: "jsonl".to_string(),
            path: None,
        };
        let (_, issues) = config.parse_backend();
        assert!(issues[0].is_error());

        let config = FilePersistenceConfig {
            backend: "JSONL".to_string(),
            path: Some(PathBuf::from("audit.jsonl")),
        };
        let (backend, issues) = config.parse_backend();
        assert_eq!(backend, PersistenceBackend::Jsonl);
        assert!(issues.is_empty());
    }
}
