//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod error;
pub mod evaluate_consensus;
pub mod gather_contributions;
pub mod orchestrator;
pub mod refinement_loop;
pub mod shared;
pub mod synthesize;

#[cfg(test)]
pub(crate) mod testing;
