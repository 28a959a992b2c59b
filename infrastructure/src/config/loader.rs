//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "taskforce";
const PROJECT_FILES: [&str; 2] = ["taskforce.toml", ".taskforce.toml"];
const ENV_PREFIX: &str = "TASKFORCE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `TASKFORCE_<SECTION>__<KEY>` (e.g. `TASKFORCE_ORACLE__COMMAND`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./taskforce.toml` or `./.taskforce.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/taskforce/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// The merged provider stack behind [`ConfigLoader::load`].
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/taskforce/config.toml`, or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// The first project-level config file present in the working directory
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}
