//! Orchestration tuning from TOML (`[execution]` section)
//!
//! ```toml
//! [execution]
//! participant_timeout_secs = 120     # unset: consultations are never cut off
//! history_window = 10
//! failure_policy = "exclude_failed"   # or "abort_round"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskforce_application::{ExecutionParams, PartialFailurePolicy};
use taskforce_domain::{ConfigIssue, ConfigIssueCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Limit for each individual oracle consultation, none when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_timeout_secs: Option<u64>,
    /// Recent messages embedded in refinement and scoring prompts
    pub history_window: usize,
    pub failure_policy: String,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            participant_timeout_secs: params.participant_timeout.map(|d| d.as_secs()),
            history_window: params.history_window,
            failure_policy: "exclude_failed".to_string(),
        }
    }
}

impl FileExecutionConfig {
    pub fn parse_failure_policy(&self) -> (PartialFailurePolicy, Vec<ConfigIssue>) {
        match self.failure_policy.to_lowercase().replace('-', "_").as_str() {
            "exclude_failed" | "exclude" => (PartialFailurePolicy::ExcludeFailed, vec![]),
            "abort_round" | "abort" => (PartialFailurePolicy::AbortRound, vec![]),
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "execution.failure_policy".to_string(),
                        value: self.failure_policy.clone(),
                        valid_values: vec![
                            "exclude_failed".to_string(),
                            "abort_round".to_string(),
                        ],
                    },
                    format!(
                        "execution.failure_policy: unknown value '{}', falling back to 'exclude_failed'",
                        self.failure_policy
                    ),
                );
                (PartialFailurePolicy::default(), vec![issue])
            }
        }
    }

    pub fn range_issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.participant_timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "execution.participant_timeout_secs".to_string(),
                    value: "0".to_string(),
                    range: "1..".to_string(),
                },
                "execution.participant_timeout_secs must be at least 1",
            ));
        }
        if self.history_window == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "execution.history_window".to_string(),
                    value: "0".to_string(),
                    range: "1..".to_string(),
                },
                "execution.history_window: 0 is raised to 1",
            ));
        }
        issues
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        let params = ExecutionParams::default()
            .with_history_window(self.history_window)
            .with_failure_policy(self.parse_failure_policy().0);
        match self.participant_timeout_secs {
            Some(secs) => params.with_participant_timeout(Duration::from_secs(secs)),
            None => params,
        }
    }
}
