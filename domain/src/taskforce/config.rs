//! Task force configuration (Value Object)
//!
//! A [`TaskForceConfig`] is created by the caller and never changes afterwards.
//! [`TaskForceConfigBuilder::build`] checks every bound. Configs assembled any
//! other way (struct literal, deserialization) must pass
//! [`TaskForceConfig::validate`] before a task force is created from them.
//!
//! | Field | Default | Bounds |
//! |-------|---------|--------|
//! | `max_agents` | 10 | 2..=50 |
//! | `max_rounds` | 10 | 1..=50 |
//! | `consensus_threshold` | 0.8 | 0.5..=1.0 |
//! | `timeout` | 30 min | 5..=120 min |

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const DEFAULT_MAX_AGENTS: usize = 10;
pub const MAX_AGENTS_LIMIT: usize = 50;
pub const MIN_PARTICIPANTS: usize = 2;

pub const DEFAULT_MAX_ROUNDS: usize = 10;
pub const MAX_ROUNDS_RANGE: RangeInclusive<usize> = 1..=50;

pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.8;
pub const CONSENSUS_THRESHOLD_RANGE: RangeInclusive<f64> = 0.5..=1.0;

pub const DEFAULT_TIMEOUT_MINUTES: u64 = 30;
pub const TIMEOUT_MINUTES_RANGE: RangeInclusive<u64> = 5..=120;

/// Lifetime of a task force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskForceKind {
    /// Long-lived council, re-executed over time
    Persistent,
    /// One-off mission (expedition)
    #[default]
    Ephemeral,
}

impl TaskForceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskForceKind::Persistent => "persistent",
            TaskForceKind::Ephemeral => "ephemeral",
        }
    }
}

impl std::fmt::Display for TaskForceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskForceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "persistent" | "council" => Ok(TaskForceKind::Persistent),
            "ephemeral" | "expedition" => Ok(TaskForceKind::Ephemeral),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown task force kind '{}'",
                other
            ))),
        }
    }
}

/// Immutable description of a task force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskForceConfig {
    /// Caller-assigned identifier of this configuration
    pub id: String,
    /// Display name
    pub name: String,
    pub kind: TaskForceKind,
    /// Free-text problem the participants work on
    pub problem_statement: String,
    /// Capability tags participants are expected to cover
    pub required_capabilities: Vec<String>,
    pub max_agents: usize,
    pub max_rounds: usize,
    pub consensus_threshold: f64,
    /// Overall wall-clock budget, checked at round boundaries
    pub timeout: Duration,
}

impl TaskForceConfig {
    /// Start building a config with all defaults applied.
    pub fn builder(
        name: impl Into<String>,
        problem_statement: impl Into<String>,
    ) -> TaskForceConfigBuilder {
        TaskForceConfigBuilder::new(name, problem_statement)
    }

    /// Check every bound.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidConfig("name cannot be empty".into()));
        }
        if self.problem_statement.trim().is_empty() {
            return Err(DomainError::InvalidConfig(
                "problem statement cannot be empty".into(),
            ));
        }
        if !(MIN_PARTICIPANTS..=MAX_AGENTS_LIMIT).contains(&self.max_agents) {
            return Err(DomainError::InvalidConfig(format!(
                "max_agents must be within {}..={}, got {}",
                MIN_PARTICIPANTS, MAX_AGENTS_LIMIT, self.max_agents
            )));
        }
        if !MAX_ROUNDS_RANGE.contains(&self.max_rounds) {
            return Err(DomainError::InvalidConfig(format!(
                "max_rounds must be within {:?}, got {}",
                MAX_ROUNDS_RANGE, self.max_rounds
            )));
        }
        if !CONSENSUS_THRESHOLD_RANGE.contains(&self.consensus_threshold) {
            return Err(DomainError::InvalidConfig(format!(
                "consensus_threshold must be within {:?}, got {}",
                CONSENSUS_THRESHOLD_RANGE, self.consensus_threshold
            )));
        }
        let minutes = self.timeout.as_secs() / 60;
        if self.timeout.subsec_nanos() != 0
            || self.timeout.as_secs() % 60 != 0
            || !TIMEOUT_MINUTES_RANGE.contains(&minutes)
        {
            return Err(DomainError::InvalidConfig(format!(
                "timeout must be a whole number of minutes within {:?}, got {}s",
                TIMEOUT_MINUTES_RANGE,
                self.timeout.as_secs()
            )));
        }
        Ok(())
    }

    /// Whether a score meets this task force's consensus threshold.
    pub fn is_consensus(&self, score: f64) -> bool {
        score >= self.consensus_threshold
    }
}

/// Builder for [`TaskForceConfig`]
#[derive(Debug, Clone)]
pub struct TaskForceConfigBuilder {
    id: Option<String>,
    name: String,
    kind: TaskForceKind,
    problem_statement: String,
    required_capabilities: Vec<String>,
    max_agents: usize,
    max_rounds: usize,
    consensus_threshold: f64,
    timeout: Duration,
}

impl TaskForceConfigBuilder {
    fn new(name: impl Into<String>, problem_statement: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: TaskForceKind::default(),
            problem_statement: problem_statement.into(),
            required_capabilities: Vec::new(),
            max_agents: DEFAULT_MAX_AGENTS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_MINUTES * 60),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(mut self, kind: TaskForceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn capability(mut self, tag: impl Into<String>) -> Self {
        self.required_capabilities.push(tag.into());
        self
    }

    pub fn max_agents(mut self, max: usize) -> Self {
        self.max_agents = max;
        self
    }

    pub fn max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn timeout_minutes(mut self, minutes: u64) -> Self {
        self.timeout = Duration::from_secs(minutes.saturating_mul(60));
        self
    }

    /// Validate every bound and produce the config.
    pub fn build(self) -> Result<TaskForceConfig, DomainError> {
        let config = TaskForceConfig {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name,
            kind: self.kind,
            problem_statement: self.problem_statement,
            required_capabilities: self.required_capabilities,
            max_agents: self.max_agents,
            max_rounds: self.max_rounds,
            consensus_threshold: self.consensus_threshold,
            timeout: self.timeout,
        };
        config.validate()?;
        Ok(config)
    }
}
