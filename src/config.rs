//! Configuration management for dlprefs

use crate::error::{PrefsError, Result};
use crate::utils::FileUtils;
use std::path::PathBuf;

/// Environment variable overriding the preference store location
pub const STORE_ENV: &str = "DLPREFS_STORE";

const STORE_DIR: &str = "dlprefs";
const STORE_FILE: &str = "preferences.sqlite";

/// Output configuration
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub verbose: bool,
    pub silent: bool,
    pub format_json: bool,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Build a configuration, using the platform config dir when no store
    /// path is given
    pub fn new(store: Option<&str>, output: OutputConfig) -> Result<Self> {
        let store_path = match store.map(str::trim).filter(|s| !s.is_empty()) {
            Some(store) => FileUtils::expand_path(store)?,
            None => default_store_path()?,
        };
        Ok(Self { store_path, output })
    }
}

/// `<config dir>/dlprefs/preferences.sqlite`
pub fn default_store_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .ok_or_else(|| PrefsError::Config("Cannot determine config directory".to_string()))?;
    Ok(base.join(STORE_DIR).join(STORE_FILE))
}
