//! Task force defaults from TOML (`[taskforce]` section)
//!
//! ```toml
//! [taskforce]
//! kind = "ephemeral"          # or "persistent" ("council" / "expedition" also accepted)
//! max_agents = 10
//! max_rounds = 10
//! consensus_threshold = 0.8
//! timeout_minutes = 30
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::RangeInclusive;
use taskforce_domain::taskforce::config::{
    CONSENSUS_THRESHOLD_RANGE, DEFAULT_CONSENSUS_THRESHOLD, DEFAULT_MAX_AGENTS,
    DEFAULT_MAX_ROUNDS, DEFAULT_TIMEOUT_MINUTES, MAX_AGENTS_LIMIT, MAX_ROUNDS_RANGE,
    MIN_PARTICIPANTS, TIMEOUT_MINUTES_RANGE,
};
use taskforce_domain::{
    ConfigIssue, ConfigIssueCode, TaskForceConfig, TaskForceConfigBuilder, TaskForceKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTaskForceConfig {
    pub kind: String,
    pub max_agents: usize,
    pub max_rounds: usize,
    pub consensus_threshold: f64,
    pub timeout_minutes: u64,
}

impl Default for FileTaskForceConfig {
    fn default() -> Self {
        Self {
            kind: TaskForceKind::default().as_str().to_string(),
            max_agents: DEFAULT_MAX_AGENTS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
        }
    }
}

fn check_range<T: PartialOrd + Display>(
    field: &str,
    value: T,
    range: &RangeInclusive<T>,
    issues: &mut Vec<ConfigIssue>,
) {
    if !range.contains(&value) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::OutOfRange {
                field: field.to_string(),
                value: value.to_string(),
                range: format!("{}..={}", range.start(), range.end()),
            },
            format!(
                "{}: {} is outside {}..={}",
                field,
                value,
                range.start(),
                range.end()
            ),
        ));
    }
}

impl FileTaskForceConfig {
    /// Parse `kind`, falling back to the default kind with a warning.
    pub fn parse_kind(&self) -> (TaskForceKind, Vec<ConfigIssue>) {
        match self.kind.parse::<TaskForceKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "taskforce.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: vec!["ephemeral".to_string(), "persistent".to_string()],
                    },
                    format!(
                        "taskforce.kind: unknown value '{}', falling back to '{}'",
                        self.kind,
                        TaskForceKind::default()
                    ),
                );
                (TaskForceKind::default(), vec![issue])
            }
        }
    }

    /// Range checks mirroring the ones enforced by [`TaskForceConfig::builder`].
    pub fn range_issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        check_range(
            "taskforce.max_agents",
            self.max_agents,
            &(MIN_PARTICIPANTS..=MAX_AGENTS_LIMIT),
            &mut issues,
        );
        check_range(
            "taskforce.max_rounds",
            self.max_rounds,
            &MAX_ROUNDS_RANGE,
            &mut issues,
        );
        check_range(
            "taskforce.consensus_threshold",
            self.consensus_threshold,
            &CONSENSUS_THRESHOLD_RANGE,
            &mut issues,
        );
        check_range(
            "taskforce.timeout_minutes",
            self.timeout_minutes,
            &TIMEOUT_MINUTES_RANGE,
            &mut issues,
        );
        issues
    }

    /// Start a [`TaskForceConfig`] builder seeded with these defaults.
    pub fn builder(
        &self,
        name: impl Into<String>,
        problem_statement: impl Into<String>,
    ) -> TaskForceConfigBuilder {
        TaskForceConfig::builder(name, problem_statement)
            .kind(self.parse_kind().0)
            .max_agents(self.max_agents)
            .max_rounds(self.max_rounds)
            .consensus_threshold(self.consensus_threshold)
            .timeout_minutes(self.timeout_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_are_valid() {
        let config = FileTaskForceConfig::default();
        assert!(config.range_issues().is_empty());
        let (kind, issues) = config.parse_kind();
        assert_eq!(kind, TaskForceKind::Ephemeral);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_deserialize_section() {
        let toml_str = r#"
[taskforce]
kind = "council"
max_rounds = 4
consensus_threshold = 0.9
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.taskforce.parse_kind().0, TaskForceKind::Persistent);
        assert_eq!(config.taskforce.max_rounds, 4);
        assert_eq!(config.taskforce.max_agents, DEFAULT_MAX_AGENTS);
    }

    #[test]
    fn test_unknown_kind_falls_back_with_warning() {
        let config = FileTaskForceConfig {
            kind: "squad".to_string(),
            ..Default::default()
        };
        let (kind, issues) = config.parse_kind();
        assert_eq!(kind, TaskForceKind::Ephemeral);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_out_of_range_values_are_errors() {
        let config = FileTaskForceConfig {
            max_rounds: 0,
            consensus_threshold: 0.3,
            timeout_minutes: 1,
            ..Default::default()
        };
        let issues = config.range_issues();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(ConfigIssue::is_error));
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::OutOfRange { field, .. } if field == "taskforce.max_rounds"
        ));
    }

    #[test]
    fn test_builder_applies_section_values() {
        let section = FileTaskForceConfig {
            max_rounds: 3,
            timeout_minutes: 10,
            ..Default::default()
        };
        let config = section.builder("Name", "Problem").build().unwrap();
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.timeout, Duration::from_secs(600));
    }
}
