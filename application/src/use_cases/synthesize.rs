//! Solution synthesis
//!
//! One oracle consultation over the entire (unwindowed) message log. There
//! is no fallback: the synthesized answer is the primary deliverable, so any
//! oracle failure fails the execution.

use crate::config::ExecutionParams;
use crate::ports::oracle::{ConsultOptions, ReasoningOracle};
use crate::use_cases::error::TaskForceError;
use std::sync::Arc;
use taskforce_domain::{Message, PromptTemplate, TaskForceConfig};
use tracing::info;

/// Use case for collapsing a discussion into one answer
pub struct SolutionSynthesizer<O: ReasoningOracle + 'static> {
    oracle: Arc<O>,
    options: ConsultOptions,
}

impl<O: ReasoningOracle + 'static> SolutionSynthesizer<O> {
    pub fn new(oracle: Arc<O>, params: &ExecutionParams) -> Self {
        Self {
            oracle,
            options: params.synthesis_options.clone(),
        }
    }

    pub async fn synthesize(
        &self,
        config: &TaskForceConfig,
        messages: &[Message],
    ) -> Result<String, TaskForceError> {
        info!("Synthesizing solution from {} messages", messages.len());

        let prompt = PromptTemplate::synthesis_prompt(config, messages);
        let solution = self
            .oracle
            .consult(&prompt, &self.options)
            .await
            .map_err(|e| TaskForceError::SynthesisFailed(e.to_string()))?;

        if solution.trim().is_empty() {
            return Err(TaskForceError::SynthesisFailed(
                "oracle returned an empty answer".to_string(),
            ));
        }
        Ok(solution)
    }
}
