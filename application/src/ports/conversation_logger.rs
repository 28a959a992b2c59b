//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording task force events
//! (contributions, exclusions, consensus scores, synthesis) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! discussion transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "contribution", "consensus_scored").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and non-fallible; implementations report their own
/// write failures through `tracing`.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
