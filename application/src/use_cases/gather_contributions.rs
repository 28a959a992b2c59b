//! Contribution gathering
//!
//! Fans one prompt per participant out to the oracle concurrently and
//! collects the settled results as a batch of [`Message`]s.

use crate::config::{ExecutionParams, PartialFailurePolicy};
use crate::ports::oracle::{ConsultOptions, OracleError, ReasoningOracle};
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::error::TaskForceError;
use crate::use_cases::shared::consult_within;
use std::sync::Arc;
use std::time::Duration;
use taskforce_domain::{Message, Participant, PromptTemplate, TaskForceConfig, TaskForceId};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Everything a single gathering round needs to build its prompts.
pub struct RoundRequest<'a> {
    pub task_force_id: &'a TaskForceId,
    pub config: &'a TaskForceConfig,
    pub participants: &'a [Participant],
    /// Round number (1-indexed)
    pub round: usize,
    /// Recent discussion window, ignored for round 1
    pub recent: &'a [Message],
}

/// A participant dropped from a round, with the reason.
#[derive(Debug, Clone)]
pub struct Exclusion {
    pub participant: Participant,
    pub error: OracleError,
}

/// Settled outcome of one round.
#[derive(Debug, Clone)]
pub struct RoundBatch {
    pub messages: Vec<Message>,
    pub excluded: Vec<Exclusion>,
}

/// Use case for gathering one round of contributions
pub struct ContributionGatherer<O: ReasoningOracle + 'static> {
    oracle: Arc<O>,
    participant_timeout: Option<Duration>,
    policy: PartialFailurePolicy,
    options: ConsultOptions,
}

impl<O: ReasoningOracle + 'static> ContributionGatherer<O> {
    pub fn new(oracle: Arc<O>, params: &ExecutionParams) -> Self {
        Self {
            oracle,
            participant_timeout: params.participant_timeout,
            policy: params.failure_policy,
            options: params.contribution_options.clone(),
        }
    }

    /// Consult every participant concurrently and wait for all to settle.
    ///
    /// Every consultation is spawned before any is awaited. Messages come
    /// back in participant order. Failed or timed-out participants are
    /// handled according to the [`PartialFailurePolicy`].
    pub async fn gather(
        &self,
        request: RoundRequest<'_>,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundBatch, TaskForceError> {
        let round = request.round;
        info!(
            task_force = %request.task_force_id,
            round,
            "Gathering contributions from {} participants",
            request.participants.len()
        );
        progress.on_round_start(round, request.participants.len());

        let mut join_set = JoinSet::new();

        for (index, participant) in request.participants.iter().enumerate() {
            let prompt = if round <= 1 {
                PromptTemplate::contribution_prompt(request.config, participant)
            } else {
                PromptTemplate::refinement_prompt(
                    request.config,
                    participant,
                    round,
                    request.recent,
                )
            };
            let oracle = Arc::clone(&self.oracle);
            let options = self.options.clone();
            let limit = self.participant_timeout;

            join_set.spawn(async move {
                let result = consult_within(oracle.as_ref(), &prompt, &options, limit).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<String, OracleError>>> =
            vec![None; request.participants.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    progress.on_contribution(round, &request.participants[index], result.is_ok());
                    slots[index] = Some(result);
                }
                Err(e) => {
                    // Its slot stays empty and is treated as a failure below
                    warn!(round, "Contribution task join error: {}", e);
                }
            }
        }

        let mut batch = RoundBatch {
            messages: Vec::new(),
            excluded: Vec::new(),
        };
        for (participant, slot) in request.participants.iter().zip(slots) {
            let result =
                slot.unwrap_or_else(|| Err(OracleError::Unavailable("task aborted".into())));

            match result {
                Ok(content) => {
                    debug!(round, participant = %participant.id, "Contribution received");
                    batch.messages.push(Message::new(
                        request.task_force_id.clone(),
                        participant,
                        content,
                        round,
                    ));
                }
                Err(error) => {
                    warn!(
                        task_force = %request.task_force_id,
                        round,
                        participant = %participant.id,
                        "Excluding participant from round: {}",
                        error
                    );
                    batch.excluded.push(Exclusion {
                        participant: participant.clone(),
                        error,
                    });
                }
            }
        }

        progress.on_round_complete(round, batch.messages.len());

        if batch.messages.is_empty() {
            return Err(TaskForceError::RoundGatherFailed { round });
        }
        if self.policy == PartialFailurePolicy::AbortRound && !batch.excluded.is_empty() {
            return Err(TaskForceError::RoundGatherFailed { round });
        }

        Ok(batch)
    }
}
