//! Domain layer for taskforce
//!
//! This crate contains the core entities, value objects and policies of the
//! task force orchestration engine. It has no dependencies on infrastructure
//! or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! - **Task force**: a bounded group of participants working on one problem,
//!   either persistent (council) or ephemeral (expedition).
//! - **Round**: one cycle in which every participant contributes once.
//! - **Message log**: the append-only, round-ordered record of a discussion.
//! - **Consensus score**: a scalar in `[0.0, 1.0]` estimating agreement.

pub mod config;
pub mod consensus;
pub mod core;
pub mod message;
pub mod prompt;
pub mod taskforce;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{NEUTRAL_SCORE, parse_consensus_score};
pub use core::{error::DomainError, string::preview};
pub use message::{Message, MessageKind, MessageLog};
pub use prompt::PromptTemplate;
pub use taskforce::{
    Participant, ParticipantId, StopReason, TaskForceConfig, TaskForceConfigBuilder, TaskForceId,
    TaskForceKind, TaskForceResult, TaskForceStatus,
};
