//! Scripted oracle and recording doubles shared by use case tests.

use crate::ports::oracle::{ConsultOptions, OracleError, ReasoningOracle};
use crate::ports::repository::{RepositoryError, TaskForceRepository};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskforce_domain::prompt::{CONSENSUS_PROMPT_HEADER, SYNTHESIS_PROMPT_HEADER};
use taskforce_domain::{
    Message, Participant, TaskForceConfig, TaskForceId, TaskForceResult,
};
use tokio::sync::Semaphore;

/// Oracle whose answers are scripted per prompt type.
///
/// Contribution prompts are recognised by the `You are <label>,` opening,
/// scoring and synthesis prompts by their fixed headers.
pub(crate) struct ScriptedOracle {
    scores: Mutex<VecDeque<String>>,
    default_score: String,
    failing: HashSet<String>,
    contribution_latency: Option<Duration>,
    fail_synthesis: bool,
    gate: Option<Arc<Semaphore>>,
    pub contribution_calls: AtomicUsize,
    pub scoring_calls: AtomicUsize,
    pub synthesis_calls: AtomicUsize,
    pub contribution_prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            scores: Mutex::new(VecDeque::new()),
            default_score: "0.0".to_string(),
            failing: HashSet::new(),
            contribution_latency: None,
            fail_synthesis: false,
            gate: None,
            contribution_calls: AtomicUsize::new(0),
            scoring_calls: AtomicUsize::new(0),
            synthesis_calls: AtomicUsize::new(0),
            contribution_prompts: Mutex::new(Vec::new()),
        }
    }

    /// Scores returned by successive scoring calls; the last one repeats.
    pub fn with_scores(mut self, scores: &[f64]) -> Self {
        let scripted: VecDeque<String> = scores.iter().map(|s| s.to_string()).collect();
        if let Some(last) = scripted.back() {
            self.default_score = last.clone();
        }
        self.scores = Mutex::new(scripted);
        self
    }

    /// Raw text returned by every scoring call.
    pub fn with_score_text(mut self, text: &str) -> Self {
        self.default_score = text.to_string();
        self
    }

    /// Participants (by label) whose contributions always fail.
    pub fn failing(mut self, labels: &[&str]) -> Self {
        self.failing = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_contribution_latency(mut self, latency: Duration) -> Self {
        self.contribution_latency = Some(latency);
        self
    }

    pub fn failing_synthesis(mut self) -> Self {
        self.fail_synthesis = true;
        self
    }

    /// Contributions block until the semaphore hands out a permit.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn contributions(&self) -> usize {
        self.contribution_calls.load(Ordering::SeqCst)
    }

    pub fn scorings(&self) -> usize {
        self.scoring_calls.load(Ordering::SeqCst)
    }

    pub fn syntheses(&self) -> usize {
        self.synthesis_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningOracle for ScriptedOracle {
    async fn consult(&self, prompt: &str, _options: &ConsultOptions) -> Result<String, OracleError> {
        if prompt.starts_with(CONSENSUS_PROMPT_HEADER) {
            self.scoring_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.scores.lock().unwrap().pop_front();
            return Ok(next.unwrap_or_else(|| self.default_score.clone()));
        }

        if prompt.starts_with(SYNTHESIS_PROMPT_HEADER) {
            self.synthesis_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_synthesis {
                return Err(OracleError::Unavailable("synthesis backend down".into()));
            }
            return Ok("Consolidated answer".to_string());
        }

        self.contribution_calls.fetch_add(1, Ordering::SeqCst);
        self.contribution_prompts
            .lock()
            .unwrap()
            .push(prompt.to_string());

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }
        if let Some(latency) = self.contribution_latency {
            tokio::time::sleep(latency).await;
        }

        let label = prompt
            .strip_prefix("You are ")
            .and_then(|rest| rest.split(',').next())
            .unwrap_or("unknown")
            .to_string();
        if self.failing.contains(&label) {
            return Err(OracleError::Unavailable(format!("{} is offline", label)));
        }
        Ok(format!("{} proposes an answer", label))
    }
}

/// Repository that counts calls and can be told to fail.
pub(crate) struct RecordingRepository {
    pub fail: bool,
    pub task_forces: AtomicUsize,
    pub messages: AtomicUsize,
    pub results: AtomicUsize,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self {
            fail: false,
            task_forces: AtomicUsize::new(0),
            messages: AtomicUsize::new(0),
            results: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn outcome(&self) -> Result<(), RepositoryError> {
        if self.fail {
            Err(RepositoryError::Io("disk full".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskForceRepository for RecordingRepository {
    async fn save_task_force(
        &self,
        _id: &TaskForceId,
        _config: &TaskForceConfig,
        _participants: &[Participant],
    ) -> Result<(), RepositoryError> {
        self.task_forces.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn append_message(
        &self,
        _id: &TaskForceId,
        _message: &Message,
    ) -> Result<(), RepositoryError> {
        self.messages.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn save_result(
        &self,
        _id: &TaskForceId,
        _result: &TaskForceResult,
    ) -> Result<(), RepositoryError> {
        self.results.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }
}

pub(crate) fn participants(n: usize) -> Vec<Participant> {
    (1..=n)
        .map(|i| Participant::new(format!("agent-{}", i), format!("Agent {}", i)))
        .collect()
}

pub(crate) fn config(max_rounds: usize, threshold: f64) -> TaskForceConfig {
    TaskForceConfig::builder("Test force", "How should we shard the user table?")
        .max_rounds(max_rounds)
        .consensus_threshold(threshold)
        .build()
        .unwrap()
}
