//! Execution parameters for the orchestration loop.
//!
//! [`ExecutionParams`] groups the static parameters that control how the
//! orchestrator consults the oracle. These are application-layer concerns,
//! not part of a task force's own configuration.

use crate::ports::oracle::ConsultOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a gathering round does when some participants fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFailurePolicy {
    /// Drop failed participants from the round; fail only if all fail.
    #[default]
    ExcludeFailed,
    /// Fail the round as soon as any participant fails.
    AbortRound,
}

/// Orchestration control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Optional sub-timeout for each individual oracle consultation.
    ///
    /// `None` lets a consultation run to completion; the task force's own
    /// budget is only checked between rounds.
    pub participant_timeout: Option<Duration>,
    /// How many recent messages are embedded in refinement and scoring prompts.
    pub history_window: usize,
    pub failure_policy: PartialFailurePolicy,
    pub contribution_options: ConsultOptions,
    pub scoring_options: ConsultOptions,
    pub synthesis_options: ConsultOptions,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            participant_timeout: None,
            history_window: 10,
            failure_policy: PartialFailurePolicy::default(),
            contribution_options: ConsultOptions::contribution(),
            scoring_options: ConsultOptions::scoring(),
            synthesis_options: ConsultOptions::synthesis(),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_participant_timeout(mut self, timeout: Duration) -> Self {
        self.participant_timeout = Some(timeout);
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    pub fn with_failure_policy(mut self, policy: PartialFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.participant_timeout, None);
        assert_eq!(params.history_window, 10);
        assert_eq!(params.failure_policy, PartialFailurePolicy::ExcludeFailed);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_participant_timeout(Duration::from_secs(5))
            .with_history_window(0)
            .with_failure_policy(PartialFailurePolicy::AbortRound);

        assert_eq!(params.participant_timeout, Some(Duration::from_secs(5)));
        assert_eq!(params.history_window, 1);
        assert_eq!(params.failure_policy, PartialFailurePolicy::AbortRound);
    }
}
