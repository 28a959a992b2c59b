//! Refinement loop
//!
//! Drives rounds 2..=max_rounds after round 1 has been gathered. Every
//! round boundary runs the same checks, in this order:
//!
//! 1. score consensus over the full log; stop if it meets the threshold
//! 2. stop if the wall-clock budget is spent
//! 3. stop if `max_rounds` rounds have been gathered
//! 4. otherwise gather the next round and repeat
//!
//! The budget is soft: it is only checked between rounds, so a run can
//! overshoot it by up to one round's gathering latency.

use crate::ports::oracle::ReasoningOracle;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::error::TaskForceError;
use crate::use_cases::evaluate_consensus::ConsensusEvaluator;
use crate::use_cases::gather_contributions::{ContributionGatherer, RoundRequest};
use crate::use_cases::shared::RunRecorder;
use serde_json::json;
use std::sync::Arc;
use taskforce_domain::{MessageLog, Participant, StopReason, TaskForceConfig, TaskForceId};
use tokio::time::Instant;
use tracing::info;

/// Mutable state of one execution, owned by the orchestrating flow.
pub struct ExecutionState {
    pub task_force_id: TaskForceId,
    pub config: TaskForceConfig,
    pub participants: Vec<Participant>,
    pub log: MessageLog,
    pub rounds_completed: usize,
    pub started: Instant,
}

impl ExecutionState {
    pub fn new(
        task_force_id: TaskForceId,
        config: TaskForceConfig,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            log: MessageLog::new(task_force_id.clone()),
            task_force_id,
            config,
            participants,
            rounds_completed: 0,
            started: Instant::now(),
        }
    }

    pub fn budget_spent(&self) -> bool {
        self.started.elapsed() >= self.config.timeout
    }
}

/// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementOutcome {
    pub stop_reason: StopReason,
    /// Score from the last evaluation, over the full log
    pub consensus_score: f64,
    pub rounds_completed: usize,
}

/// Use case for iterating rounds until a stop condition holds
pub struct RefinementLoop<O: ReasoningOracle + 'static> {
    gatherer: Arc<ContributionGatherer<O>>,
    evaluator: Arc<ConsensusEvaluator<O>>,
    history_window: usize,
}

impl<O: ReasoningOracle + 'static> RefinementLoop<O> {
    pub fn new(
        gatherer: Arc<ContributionGatherer<O>>,
        evaluator: Arc<ConsensusEvaluator<O>>,
        history_window: usize,
    ) -> Self {
        Self {
            gatherer,
            evaluator,
            history_window,
        }
    }

    /// Run until consensus, budget exhaustion or the round limit.
    ///
    /// Expects round 1 to be in `state.log` already.
    pub async fn run(
        &self,
        state: &mut ExecutionState,
        recorder: &RunRecorder,
        progress: &dyn ProgressNotifier,
    ) -> Result<RefinementOutcome, TaskForceError> {
        loop {
            let round = state.rounds_completed;
            let score = self
                .evaluator
                .score(&state.config.problem_statement, state.log.messages())
                .await;

            info!(
                task_force = %state.task_force_id,
                round,
                "Consensus after round {}: {:.2} (threshold {:.2})",
                round,
                score,
                state.config.consensus_threshold
            );
            progress.on_consensus(round, score);
            recorder.event(
                "consensus_scored",
                json!({
                    "task_force": state.task_force_id,
                    "round": round,
                    "score": score,
                    "threshold": state.config.consensus_threshold,
                }),
            );

            let stop = if state.config.is_consensus(score) {
                Some(StopReason::ConsensusReached)
            } else if state.budget_spent() {
                Some(StopReason::TimedOut)
            } else if round >= state.config.max_rounds {
                Some(StopReason::RoundLimitReached)
            } else {
                None
            };

            if let Some(stop_reason) = stop {
                info!(
                    task_force = %state.task_force_id,
                    "Stopping after round {}: {}",
                    round,
                    stop_reason
                );
                return Ok(RefinementOutcome {
                    stop_reason,
                    consensus_score: score,
                    rounds_completed: round,
                });
            }

            let next = round + 1;
            let batch = self
                .gatherer
                .gather(
                    RoundRequest {
                        task_force_id: &state.task_force_id,
                        config: &state.config,
                        participants: &state.participants,
                        round: next,
                        recent: state.log.recent(self.history_window),
                    },
                    progress,
                )
                .await?;

            for exclusion in &batch.excluded {
                recorder.event(
                    "participant_excluded",
                    json!({
                        "task_force": state.task_force_id,
                        "round": next,
                        "participant": exclusion.participant.id,
                        "error": exclusion.error.to_string(),
                    }),
                );
            }
            recorder.append_round(&mut state.log, batch.messages).await?;
            state.rounds_completed = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionParams;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::progress::NoProgress;
    use crate::ports::repository::NoPersistence;
    use crate::use_cases::testing::{ScriptedOracle, config, participants};
    use taskforce_domain::Message;

    fn make_loop(oracle: Arc<ScriptedOracle>) -> RefinementLoop<ScriptedOracle> {
        let params = ExecutionParams::default();
        RefinementLoop::new(
            Arc::new(ContributionGatherer::new(Arc::clone(&oracle), &params)),
            Arc::new(ConsensusEvaluator::new(oracle, &params)),
            params.history_window,
        )
    }

    fn recorder() -> RunRecorder {
        RunRecorder::new(Arc::new(NoPersistence), Arc::new(NoConversationLogger))
    }

    /// State with a hand-made round 1 already logged.
    fn seeded_state(max_rounds: usize, threshold: f64, people: usize) -> ExecutionState {
        let id = TaskForceId::new("tf");
        let mut state = ExecutionState::new(
            id.clone(),
            config(max_rounds, threshold),
            participants(people),
        );
        for p in state.participants.clone() {
            state
                .log
                .append(Message::new(id.clone(), &p, "first take", 1))
                .unwrap();
        }
        state.rounds_completed = 1;
        state
    }

    #[tokio::test]
    async fn test_immediate_consensus_gathers_nothing_more() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.95]));
        let refinement = make_loop(Arc::clone(&oracle));
        let mut state = seeded_state(5, 0.8, 3);

        let outcome = refinement
            .run(&mut state, &recorder(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::ConsensusReached);
        assert_eq!(outcome.rounds_completed, 1);
        assert_eq!(oracle.contributions(), 0);
    }

    #[tokio::test]
    async fn test_round_limit_with_zero_consensus() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.0]));
        let refinement = make_loop(Arc::clone(&oracle));
        let mut state = seeded_state(4, 0.8, 3);

        let outcome = refinement
            .run(&mut state, &recorder(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::RoundLimitReached);
        assert_eq!(outcome.rounds_completed, 4);
        assert_eq!(outcome.consensus_score, 0.0);
        assert_eq!(state.log.len(), 4 * 3);
        assert_eq!(state.log.last_round(), 4);
        // Rounds 2..=4 were gathered by the loop
        assert_eq!(oracle.contributions(), 3 * 3);
        assert_eq!(oracle.scorings(), 4);
    }

    #[tokio::test]
    async fn test_consensus_measured_after_each_round() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.3, 0.9]));
        let refinement = make_loop(Arc::clone(&oracle));
        let mut state = seeded_state(10, 0.8, 2);

        let outcome = refinement
            .run(&mut state, &recorder(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::ConsensusReached);
        assert_eq!(outcome.rounds_completed, 2);
        assert_eq!(outcome.consensus_score, 0.9);
        assert_eq!(oracle.contributions(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_checked_at_round_boundary() {
        let oracle = Arc::new(
            ScriptedOracle::new()
                .with_scores(&[0.1])
                .with_contribution_latency(std::time::Duration::from_secs(90)),
        );
        let params = ExecutionParams::default();
        let refinement = RefinementLoop::new(
            Arc::new(ContributionGatherer::new(Arc::clone(&oracle), &params)),
            Arc::new(ConsensusEvaluator::new(Arc::clone(&oracle), &params)),
            params.history_window,
        );
        // 5 minute budget, 90s per round: round 5 lands at 360s, past the budget
        let mut state = seeded_state(50, 0.8, 2);
        state.config = TaskForceConfig::builder("t", "p")
            .max_rounds(50)
            .timeout_minutes(5)
            .build()
            .unwrap();

        let outcome = refinement
            .run(&mut state, &recorder(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::TimedOut);
        assert_eq!(outcome.rounds_completed, 5);
    }
}
