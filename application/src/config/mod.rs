//! Application-level configuration.
//!
//! - [`ExecutionParams`]: per-consultation timeouts, prompt windowing,
//!   partial-failure policy and oracle option presets

pub mod execution_params;

pub use execution_params::{ExecutionParams, PartialFailurePolicy};
