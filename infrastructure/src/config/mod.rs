//! Configuration file loading for taskforce
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TASKFORCE_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./taskforce.toml` or `./.taskforce.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/taskforce/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileExecutionConfig, FileLoggingConfig, FileOracleConfig, FileOutputConfig,
    FilePersistenceConfig, FileTaskForceConfig, PersistenceBackend,
};
pub use loader::ConfigLoader;
