//! Consensus evaluation
//!
//! Scores how much the discussion so far agrees. Never fails: oracle errors,
//! timeouts and unparseable answers all degrade to [`NEUTRAL_SCORE`].

use crate::config::ExecutionParams;
use crate::ports::oracle::{ConsultOptions, ReasoningOracle};
use crate::use_cases::shared::consult_within;
use std::sync::Arc;
use std::time::Duration;
use taskforce_domain::{Message, NEUTRAL_SCORE, PromptTemplate, parse_consensus_score, preview};
use tracing::{debug, warn};

/// Use case for scoring agreement over the message log
pub struct ConsensusEvaluator<O: ReasoningOracle + 'static> {
    oracle: Arc<O>,
    window: usize,
    call_timeout: Option<Duration>,
    options: ConsultOptions,
}

impl<O: ReasoningOracle + 'static> ConsensusEvaluator<O> {
    pub fn new(oracle: Arc<O>, params: &ExecutionParams) -> Self {
        Self {
            oracle,
            window: params.history_window,
            call_timeout: params.participant_timeout,
            options: params.scoring_options.clone(),
        }
    }

    /// Score agreement in `[0.0, 1.0]` from the full message log.
    ///
    /// Fewer than two messages give no basis for agreement and score 0.0
    /// without consulting the oracle. Otherwise the most recent messages
    /// (up to the history window) are sent to the oracle for rating.
    pub async fn score(&self, problem: &str, messages: &[Message]) -> f64 {
        if messages.len() < 2 {
            return 0.0;
        }

        let start = messages.len().saturating_sub(self.window);
        let prompt = PromptTemplate::consensus_prompt(problem, &messages[start..]);

        let response =
            consult_within(self.oracle.as_ref(), &prompt, &self.options, self.call_timeout).await;

        match response {
            Ok(text) => match parse_consensus_score(&text) {
                Some(score) => {
                    debug!("Consensus score: {:.2}", score);
                    score
                }
                None => {
                    warn!(
                        "Could not parse consensus score from '{}', using neutral {}",
                        preview(&text, 80),
                        NEUTRAL_SCORE
                    );
                    NEUTRAL_SCORE
                }
            },
            Err(e) => {
                warn!(
                    "Consensus scoring failed ({}), using neutral {}",
                    e, NEUTRAL_SCORE
                );
                NEUTRAL_SCORE
            }
        }
    }
}
