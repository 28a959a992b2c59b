//! Discussion messages and the per-task-force message log.

pub mod entities;
pub mod log;

pub use entities::{Message, MessageKind};
pub use log::MessageLog;
