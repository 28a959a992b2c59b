//! Progress notification port
//!
//! Defines the interface for reporting progress during task force execution.

use taskforce_domain::{Participant, TaskForceResult};

/// Callback for progress updates during task force execution
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a gathering round starts
    fn on_round_start(&self, round: usize, participants: usize);

    /// Called when one participant's consultation settles within a round
    fn on_contribution(&self, round: usize, participant: &Participant, success: bool);

    /// Called when every consultation of a round has settled
    fn on_round_complete(&self, round: usize, collected: usize);

    /// Called after consensus has been scored following `round`
    fn on_consensus(&self, _round: usize, _score: f64) {}

    /// Called before the synthesis consultation
    fn on_synthesis_start(&self) {}

    /// Called with the final result
    fn on_complete(&self, _result: &TaskForceResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: usize, _participants: usize) {}
    fn on_contribution(&self, _round: usize, _participant: &Participant, _success: bool) {}
    fn on_round_complete(&self, _round: usize, _collected: usize) {}
}
