//! Task force orchestrator
//!
//! Top-level coordinator: owns the registry of created task forces, enforces
//! the single-live-execution rule, and wires gathering, consensus scoring,
//! refinement and synthesis into one `execute` call.
//!
//! ```text
//! create ──▶ registry (Created)
//!
//! execute ──▶ gather round 1 ──▶ RefinementLoop ──▶ synthesize ──▶ TaskForceResult
//!               │                    │                  │
//!               └──── RoundGatherFailed / SynthesisFailed / ExecutionFailed ──▶ Failed
//! ```
//!
//! The registry is owned by the orchestrator instance, so independent
//! orchestrators in one process never share state. The message log of an
//! execution lives only for the duration of that execution; durable copies
//! go through the [`TaskForceRepository`] port.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::oracle::ReasoningOracle;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::repository::{NoPersistence, TaskForceRepository};
use crate::use_cases::error::TaskForceError;
use crate::use_cases::evaluate_consensus::ConsensusEvaluator;
use crate::use_cases::gather_contributions::{ContributionGatherer, RoundRequest};
use crate::use_cases::refinement_loop::{ExecutionState, RefinementLoop};
use crate::use_cases::shared::RunRecorder;
use crate::use_cases::synthesize::SolutionSynthesizer;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use taskforce_domain::taskforce::config::MIN_PARTICIPANTS;
use taskforce_domain::{
    DomainError, Participant, TaskForceConfig, TaskForceId, TaskForceResult, TaskForceStatus,
};
use tracing::{error, info};

/// A created task force, as kept in the registry
struct TaskForceEntry {
    config: TaskForceConfig,
    participants: Vec<Participant>,
    status: TaskForceStatus,
    running: bool,
}

type Registry = Arc<Mutex<HashMap<TaskForceId, TaskForceEntry>>>;

fn lock(registry: &Registry) -> MutexGuard<'_, HashMap<TaskForceId, TaskForceEntry>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the running flag when an execution ends, however it ends.
struct RunGuard {
    registry: Registry,
    id: TaskForceId,
}

impl RunGuard {
    fn set_status(&self, status: TaskForceStatus) {
        if let Some(entry) = lock(&self.registry).get_mut(&self.id) {
            entry.status = status;
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Some(entry) = lock(&self.registry).get_mut(&self.id) {
            entry.running = false;
        }
    }
}

/// Use case for creating and executing task forces
pub struct TaskForceOrchestrator<O: ReasoningOracle + 'static> {
    gatherer: Arc<ContributionGatherer<O>>,
    refinement: RefinementLoop<O>,
    synthesizer: SolutionSynthesizer<O>,
    recorder: RunRecorder,
    registry: Registry,
    history_window: usize,
}

impl<O: ReasoningOracle + 'static> TaskForceOrchestrator<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self::with_collaborators(
            oracle,
            ExecutionParams::default(),
            Arc::new(NoPersistence),
            Arc::new(NoConversationLogger),
        )
    }

    pub fn with_collaborators(
        oracle: Arc<O>,
        params: ExecutionParams,
        repository: Arc<dyn TaskForceRepository>,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        let gatherer = Arc::new(ContributionGatherer::new(Arc::clone(&oracle), &params));
        let evaluator = Arc::new(ConsensusEvaluator::new(Arc::clone(&oracle), &params));
        Self {
            refinement: RefinementLoop::new(
                Arc::clone(&gatherer),
                evaluator,
                params.history_window,
            ),
            synthesizer: SolutionSynthesizer::new(oracle, &params),
            gatherer,
            recorder: RunRecorder::new(repository, logger),
            registry: Arc::new(Mutex::new(HashMap::new())),
            history_window: params.history_window,
        }
    }

    /// Register a new task force and return its generated identifier.
    ///
    /// Rejected outright, with nothing registered or persisted, when the
    /// config is out of bounds, the participant set exceeds
    /// `config.max_agents` or has fewer than two members, or a participant
    /// identifier repeats.
    pub async fn create(
        &self,
        config: TaskForceConfig,
        participants: Vec<Participant>,
    ) -> Result<TaskForceId, TaskForceError> {
        config.validate()?;
        validate_participants(&config, &participants)?;

        let id = TaskForceId::generate();
        info!(
            task_force = %id,
            kind = %config.kind,
            "Created task force '{}' with {} participants",
            config.name,
            participants.len()
        );

        self.recorder.save_task_force(&id, &config, &participants).await;
        self.recorder.event(
            "task_force_created",
            json!({
                "task_force": id,
                "name": config.name,
                "kind": config.kind,
                "participants": participants.iter().map(|p| &p.id).collect::<Vec<_>>(),
                "max_rounds": config.max_rounds,
                "consensus_threshold": config.consensus_threshold,
            }),
        );

        lock(&self.registry).insert(
            id.clone(),
            TaskForceEntry {
                config,
                participants,
                status: TaskForceStatus::Created,
                running: false,
            },
        );
        Ok(id)
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, id: &TaskForceId) -> Result<TaskForceResult, TaskForceError> {
        self.execute_with_progress(id, &NoProgress).await
    }

    /// Run the full lifecycle of a created task force.
    ///
    /// Returns a result whenever synthesis succeeds, including runs that stop
    /// on the round limit or the time budget (`success = false`). Fatal
    /// errors leave the task force `Failed` and are never retried.
    pub async fn execute_with_progress(
        &self,
        id: &TaskForceId,
        progress: &dyn ProgressNotifier,
    ) -> Result<TaskForceResult, TaskForceError> {
        let (config, participants) = {
            let mut registry = lock(&self.registry);
            let entry = registry
                .get_mut(id)
                .ok_or_else(|| TaskForceError::UnknownTaskForce(id.clone()))?;
            if entry.running {
                return Err(TaskForceError::AlreadyRunning(id.clone()));
            }
            entry.running = true;
            entry.status = TaskForceStatus::Running;
            (entry.config.clone(), entry.participants.clone())
        };
        let guard = RunGuard {
            registry: Arc::clone(&self.registry),
            id: id.clone(),
        };

        let mut status = TaskForceStatus::Created;
        let outcome = self
            .run_lifecycle(id, config, participants, &mut status, &guard, progress)
            .await;

        match outcome {
            Ok(result) => {
                info!(
                    task_force = %id,
                    success = result.success,
                    "Task force completed after {} rounds ({}, consensus {:.2})",
                    result.rounds_completed,
                    result.stop_reason,
                    result.consensus_score
                );
                self.recorder.event(
                    "task_force_completed",
                    json!({
                        "task_force": id,
                        "success": result.success,
                        "stop_reason": result.stop_reason,
                        "consensus_score": result.consensus_score,
                        "rounds_completed": result.rounds_completed,
                        "message_count": result.message_count,
                        "execution_time_ms": result.execution_time.as_millis() as u64,
                    }),
                );
                self.recorder.save_result(id, &result).await;
                progress.on_complete(&result);
                Ok(result)
            }
            Err(e) => {
                let e = if e.is_fatal() {
                    e
                } else {
                    TaskForceError::ExecutionFailed(e.to_string())
                };
                error!(task_force = %id, "Task force failed in state {}: {}", status, e);
                if status.transition(TaskForceStatus::Failed).is_err() {
                    status = TaskForceStatus::Failed;
                }
                guard.set_status(status);
                self.recorder.event(
                    "task_force_failed",
                    json!({ "task_force": id, "error": e.to_string() }),
                );
                Err(e)
            }
        }
    }

    async fn run_lifecycle(
        &self,
        id: &TaskForceId,
        config: TaskForceConfig,
        participants: Vec<Participant>,
        status: &mut TaskForceStatus,
        guard: &RunGuard,
        progress: &dyn ProgressNotifier,
    ) -> Result<TaskForceResult, TaskForceError> {
        let mut state = ExecutionState::new(id.clone(), config, participants);
        advance(status, TaskForceStatus::Running, guard)?;

        let batch = self
            .gatherer
            .gather(
                RoundRequest {
                    task_force_id: id,
                    config: &state.config,
                    participants: &state.participants,
                    round: 1,
                    recent: state.log.recent(self.history_window),
                },
                progress,
            )
            .await?;
        for exclusion in &batch.excluded {
            self.recorder.event(
                "participant_excluded",
                json!({
                    "task_force": id,
                    "round": 1,
                    "participant": exclusion.participant.id,
                    "error": exclusion.error.to_string(),
                }),
            );
        }
        self.recorder.append_round(&mut state.log, batch.messages).await?;
        state.rounds_completed = 1;

        let outcome = self.refinement.run(&mut state, &self.recorder, progress).await?;
        advance(status, outcome.stop_reason.status(), guard)?;

        advance(status, TaskForceStatus::Synthesizing, guard)?;
        progress.on_synthesis_start();
        let solution = self
            .synthesizer
            .synthesize(&state.config, state.log.messages())
            .await?;
        self.recorder.event(
            "synthesis",
            json!({ "task_force": id, "text": solution }),
        );

        let result = TaskForceResult {
            task_force_id: id.clone(),
            success: state.config.is_consensus(outcome.consensus_score),
            solution,
            consensus_score: outcome.consensus_score,
            stop_reason: outcome.stop_reason,
            participants: state.participants.iter().map(|p| p.id.clone()).collect(),
            message_count: state.log.len(),
            rounds_completed: outcome.rounds_completed,
            execution_time: state.started.elapsed(),
            first_round_contributions: state.log.first_round_contributions(),
        };
        advance(status, TaskForceStatus::Completed, guard)?;
        Ok(result)
    }

    /// Last known lifecycle state of a task force.
    pub fn status(&self, id: &TaskForceId) -> Option<TaskForceStatus> {
        lock(&self.registry).get(id).map(|entry| entry.status)
    }

    /// Whether an execution of this task force is in flight.
    pub fn is_running(&self, id: &TaskForceId) -> bool {
        lock(&self.registry)
            .get(id)
            .map(|entry| entry.running)
            .unwrap_or(false)
    }

    pub fn participants(&self, id: &TaskForceId) -> Option<Vec<Participant>> {
        lock(&self.registry)
            .get(id)
            .map(|entry| entry.participants.clone())
    }
}

fn advance(
    status: &mut TaskForceStatus,
    to: TaskForceStatus,
    guard: &RunGuard,
) -> Result<(), TaskForceError> {
    status.transition(to)?;
    guard.set_status(to);
    Ok(())
}

fn validate_participants(
    config: &TaskForceConfig,
    participants: &[Participant],
) -> Result<(), TaskForceError> {
    if participants.len() > config.max_agents {
        return Err(DomainError::CapacityExceeded {
            requested: participants.len(),
            max: config.max_agents,
        }
        .into());
    }
    if participants.len() < MIN_PARTICIPANTS {
        return Err(DomainError::InsufficientParticipants {
            count: participants.len(),
        }
        .into());
    }
    let mut seen = HashSet::new();
    for participant in participants {
        if !seen.insert(&participant.id) {
            return Err(DomainError::InvalidConfig(format!(
                "participant '{}' listed twice",
                participant.id
            ))
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{RecordingRepository, ScriptedOracle, config, participants};
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use taskforce_domain::{MessageKind, StopReason};
    use tokio::sync::Semaphore;

    fn orchestrator(oracle: Arc<ScriptedOracle>) -> TaskForceOrchestrator<ScriptedOracle> {
        TaskForceOrchestrator::new(oracle)
    }

    #[tokio::test]
    async fn test_create_rejects_too_many_participants() {
        let orch = orchestrator(Arc::new(ScriptedOracle::new()));
        let config = TaskForceConfig::builder("t", "p").max_agents(2).build().unwrap();

        let err = orch.create(config, participants(3)).await.unwrap_err();
        assert_eq!(
            err,
            TaskForceError::CapacityExceeded {
                requested: 3,
                max: 2
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_single_participant() {
        let orch = orchestrator(Arc::new(ScriptedOracle::new()));

        let err = orch.create(config(3, 0.8), participants(1)).await.unwrap_err();
        assert_eq!(err, TaskForceError::InsufficientParticipants { count: 1 });
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_participants() {
        let orch = orchestrator(Arc::new(ScriptedOracle::new()));
        let people = vec![Participant::unlabeled("a"), Participant::unlabeled("a")];

        let err = orch.create(config(3, 0.8), people).await.unwrap_err();
        assert!(matches!(err, TaskForceError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_config_that_skipped_the_builder() {
        let repository = Arc::new(RecordingRepository::new());
        let orch = TaskForceOrchestrator::with_collaborators(
            Arc::new(ScriptedOracle::new()),
            ExecutionParams::default(),
            repository.clone(),
            Arc::new(NoConversationLogger),
        );
        let mut config = config(3, 0.8);
        config.max_rounds = 0;

        let err = orch.create(config, participants(2)).await.unwrap_err();

        assert!(matches!(err, TaskForceError::InvalidConfig(_)));
        assert_eq!(repository.task_forces.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_persists_and_registers() {
        let repository = Arc::new(RecordingRepository::new());
        let orch = TaskForceOrchestrator::with_collaborators(
            Arc::new(ScriptedOracle::new()),
            ExecutionParams::default(),
            repository.clone(),
            Arc::new(NoConversationLogger),
        );

        let id = orch.create(config(3, 0.8), participants(2)).await.unwrap();

        assert_eq!(orch.status(&id), Some(TaskForceStatus::Created));
        assert_eq!(orch.participants(&id).unwrap().len(), 2);
        assert_eq!(repository.task_forces.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_unknown_task_force() {
        let orch = orchestrator(Arc::new(ScriptedOracle::new()));
        let err = orch.execute(&TaskForceId::new("nope")).await.unwrap_err();
        assert!(matches!(err, TaskForceError::UnknownTaskForce(_)));
    }

    #[tokio::test]
    async fn test_end_to_end_converges_on_third_round() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.3, 0.6, 0.85]));
        let orch = orchestrator(Arc::clone(&oracle));
        let id = orch.create(config(3, 0.8), participants(4)).await.unwrap();

        let result = orch.execute(&id).await.unwrap();

        assert_eq!(oracle.scorings(), 3);
        assert_eq!(result.stop_reason, StopReason::ConsensusReached);
        assert_eq!(result.consensus_score, 0.85);
        assert_eq!(result.rounds_completed, 3);
        assert_eq!(result.message_count, 3 * 4);
        assert!(result.success);
        assert_eq!(result.solution, "Consolidated answer");
        assert_eq!(result.participants.len(), 4);
        assert_eq!(result.first_round_contributions.len(), 4);
        assert_eq!(orch.status(&id), Some(TaskForceStatus::Completed));
    }

    #[tokio::test]
    async fn test_consensus_on_round_two_skips_round_three() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.2, 0.9]));
        let orch = orchestrator(Arc::clone(&oracle));
        let id = orch.create(config(10, 0.8), participants(3)).await.unwrap();

        let result = orch.execute(&id).await.unwrap();

        assert_eq!(result.stop_reason, StopReason::ConsensusReached);
        assert_eq!(result.rounds_completed, 2);
        // Two rounds of three participants, no third round
        assert_eq!(oracle.contributions(), 6);
    }

    #[tokio::test]
    async fn test_zero_consensus_runs_all_rounds() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.0]));
        let orch = orchestrator(Arc::clone(&oracle));
        let id = orch.create(config(5, 0.8), participants(3)).await.unwrap();

        let result = orch.execute(&id).await.unwrap();

        assert_eq!(result.stop_reason, StopReason::RoundLimitReached);
        assert_eq!(result.rounds_completed, 5);
        assert_eq!(result.message_count, 5 * 3);
        assert!(!result.success);
        assert!(!result.solution.is_empty());
        assert!(result.rounds_completed <= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_past_budget_times_out() {
        // Each contribution takes longer than the whole 5 minute budget
        let oracle = Arc::new(
            ScriptedOracle::new()
                .with_scores(&[0.0])
                .with_contribution_latency(Duration::from_secs(6 * 60)),
        );
        let orch = TaskForceOrchestrator::new(Arc::clone(&oracle));
        let config = TaskForceConfig::builder("t", "p")
            .max_rounds(10)
            .timeout_minutes(5)
            .build()
            .unwrap();
        let id = orch.create(config, participants(2)).await.unwrap();

        let result = orch.execute(&id).await.unwrap();

        assert_eq!(result.stop_reason, StopReason::TimedOut);
        assert!(!result.success);
        assert_eq!(result.rounds_completed, 1);
        assert_eq!(result.message_count, 2);
        assert!(result.execution_time >= Duration::from_secs(5 * 60));
        assert_eq!(oracle.syntheses(), 1);
        assert_eq!(orch.status(&id), Some(TaskForceStatus::Completed));
    }

    #[tokio::test]
    async fn test_partial_failure_continues_without_participant() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.0]).failing(&["Agent 2"]));
        let orch = orchestrator(Arc::clone(&oracle));
        let id = orch.create(config(2, 0.8), participants(3)).await.unwrap();

        let result = orch.execute(&id).await.unwrap();

        assert_eq!(result.message_count, 2 * 2);
        assert!(
            !result
                .first_round_contributions
                .contains_key(&taskforce_domain::ParticipantId::new("agent-2"))
        );
    }

    #[tokio::test]
    async fn test_all_participants_failing_fails_execution() {
        let oracle = Arc::new(ScriptedOracle::new().failing(&["Agent 1", "Agent 2"]));
        let orch = orchestrator(Arc::clone(&oracle));
        let id = orch.create(config(3, 0.8), participants(2)).await.unwrap();

        let err = orch.execute(&id).await.unwrap_err();

        assert_eq!(err, TaskForceError::RoundGatherFailed { round: 1 });
        assert_eq!(orch.status(&id), Some(TaskForceStatus::Failed));
        assert!(!orch.is_running(&id));
    }

    #[tokio::test]
    async fn test_synthesis_failure_returns_no_result() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.9]).failing_synthesis());
        let repository = Arc::new(RecordingRepository::new());
        let orch = TaskForceOrchestrator::with_collaborators(
            Arc::clone(&oracle),
            ExecutionParams::default(),
            repository.clone(),
            Arc::new(NoConversationLogger),
        );
        let id = orch.create(config(3, 0.8), participants(2)).await.unwrap();

        let err = orch.execute(&id).await.unwrap_err();

        assert!(matches!(err, TaskForceError::SynthesisFailed(_)));
        assert_eq!(oracle.syntheses(), 1);
        assert_eq!(repository.results.load(Ordering::SeqCst), 0);
        assert_eq!(orch.status(&id), Some(TaskForceStatus::Failed));
    }

    #[tokio::test]
    async fn test_sequential_executions_are_independent() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.9]));
        let orch = orchestrator(Arc::clone(&oracle));
        let id = orch.create(config(3, 0.8), participants(2)).await.unwrap();

        let first = orch.execute(&id).await.unwrap();
        let second = orch.execute(&id).await.unwrap();

        // Each run starts from an empty log
        assert_eq!(first.message_count, 2);
        assert_eq!(second.message_count, 2);
        assert!(!orch.is_running(&id));
    }

    #[tokio::test]
    async fn test_concurrent_execution_is_rejected() {
        let gate = Arc::new(Semaphore::new(0));
        let oracle = Arc::new(
            ScriptedOracle::new()
                .with_scores(&[0.9])
                .gated(Arc::clone(&gate)),
        );
        let orch = Arc::new(orchestrator(oracle));
        let id = orch.create(config(3, 0.8), participants(2)).await.unwrap();

        let running = {
            let orch = Arc::clone(&orch);
            let id = id.clone();
            tokio::spawn(async move { orch.execute(&id).await })
        };
        while !orch.is_running(&id) {
            tokio::task::yield_now().await;
        }

        let err = orch.execute(&id).await.unwrap_err();
        assert_eq!(err, TaskForceError::AlreadyRunning(id.clone()));
        assert_eq!(orch.status(&id), Some(TaskForceStatus::Running));

        gate.add_permits(16);
        let result = running.await.unwrap().unwrap();
        assert_eq!(result.stop_reason, StopReason::ConsensusReached);
        assert!(!orch.is_running(&id));
    }

    #[tokio::test]
    async fn test_unrelated_task_forces_run_in_parallel() {
        let oracle = Arc::new(ScriptedOracle::new().with_scores(&[0.9]));
        let orch = orchestrator(oracle);
        let a = orch.create(config(3, 0.8), participants(2)).await.unwrap();
        let b = orch.create(config(3, 0.8), participants(3)).await.unwrap();

        let (ra, rb) = tokio::join!(orch.execute(&a), orch.execute(&b));

        assert_eq!(ra.unwrap().message_count, 2);
        assert_eq!(rb.unwrap().message_count, 3);
    }

    #[tokio::test]
    async fn test_persistence_failures_do_not_affect_result() {
        let repository = Arc::new(RecordingRepository::failing());
        let orch = TaskForceOrchestrator::with_collaborators(
            Arc::new(ScriptedOracle::new().with_scores(&[0.0])),
            ExecutionParams::default(),
            repository.clone(),
            Arc::new(NoConversationLogger),
        );
        let id = orch.create(config(2, 0.8), participants(2)).await.unwrap();

        let result = orch.execute(&id).await.unwrap();

        assert_eq!(result.message_count, 4);
        assert_eq!(repository.messages.load(Ordering::SeqCst), 4);
        assert_eq!(repository.results.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_message_kinds_follow_rounds() {
        struct KindCheck(Mutex<Vec<(usize, MessageKind)>>);

        #[async_trait::async_trait]
        impl TaskForceRepository for KindCheck {
            async fn save_task_force(
                &self,
                _: &TaskForceId,
                _: &TaskForceConfig,
                _: &[Participant],
            ) -> Result<(), crate::ports::repository::RepositoryError> {
                Ok(())
            }
            async fn append_message(
                &self,
                _: &TaskForceId,
                message: &taskforce_domain::Message,
            ) -> Result<(), crate::ports::repository::RepositoryError> {
                self.0.lock().unwrap().push((message.round, message.kind));
                Ok(())
            }
            async fn save_result(
                &self,
                _: &TaskForceId,
                _: &TaskForceResult,
            ) -> Result<(), crate::ports::repository::RepositoryError> {
                Ok(())
            }
        }

        let repository = Arc::new(KindCheck(Mutex::new(Vec::new())));
        let orch = TaskForceOrchestrator::with_collaborators(
            Arc::new(ScriptedOracle::new().with_scores(&[0.0])),
            ExecutionParams::default(),
            repository.clone(),
            Arc::new(NoConversationLogger),
        );
        let id = orch.create(config(3, 0.8), participants(2)).await.unwrap();
        orch.execute(&id).await.unwrap();

        let seen = repository.0.lock().unwrap();
        let rounds: Vec<usize> = seen.iter().map(|(r, _)| *r).collect();
        assert_eq!(rounds, vec![1, 1, 2, 2, 3, 3]);
        assert!(seen.iter().all(|(round, kind)| (*round == 1) == (*kind == MessageKind::Contribution)));
    }
}
