//! Task force subdomain: configuration, identity, lifecycle and result.

pub mod config;
pub mod participant;
pub mod result;
pub mod status;

pub use config::{TaskForceConfig, TaskForceConfigBuilder, TaskForceKind};
pub use participant::{Participant, ParticipantId, TaskForceId};
pub use result::{StopReason, TaskForceResult};
pub use status::TaskForceStatus;
