//! Consensus measurement policy shared by the evaluator and its tests.

pub mod parsing;

pub use parsing::{NEUTRAL_SCORE, parse_consensus_score};
