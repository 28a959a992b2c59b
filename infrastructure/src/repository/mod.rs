//! Task force repository adapters.
//!
//! - [`InMemoryTaskForceRepository`]: process-local records, for tests and
//!   single-shot runs
//! - [`JsonlTaskForceRepository`]: append-only JSONL audit file

mod jsonl;
mod memory;

pub use jsonl::JsonlTaskForceRepository;
pub use memory::{InMemoryTaskForceRepository, StoredTaskForce};
