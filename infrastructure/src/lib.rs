//! Infrastructure layer for taskforce
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod oracle;
pub mod repository;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, PersistenceBackend};
pub use logging::JsonlConversationLogger;
pub use oracle::CommandOracle;
pub use repository::{InMemoryTaskForceRepository, JsonlTaskForceRepository};
