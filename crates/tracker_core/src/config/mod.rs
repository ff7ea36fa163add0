//! Optional user configuration. Every field has a default, so a missing file
//! is not an error and a broken one only costs a warning.

use crate::error::AppError;
use crate::reset::CHECK_INTERVAL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR_NAME: &str = "tracker";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TRACKER_CONFIG_PATH";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog file to use instead of the built-in registry.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub check_interval_secs: Option<u64>,
}

impl Config {
    /// Poll interval of the reset scheduler; unset or zero means the default.
    pub fn check_interval(&self) -> Duration {
        self.check_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(CHECK_INTERVAL)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if overrides.catalog_path.is_some() {
            self.catalog_path = overrides.catalog_path.clone();
        }
        if overrides.check_interval_secs.is_some() {
            self.check_interval_secs = overrides.check_interval_secs;
        }
        self
    }
}

/// Command-line values layered over the file. `None` keeps the file value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub check_interval_secs: Option<u64>,
}

/// Result of reading the config file. `problem` is set when the file existed
/// but could not be used; `config` is then the default.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub problem: Option<AppError>,
}

impl LoadedConfig {
    fn fallback(problem: Option<AppError>) -> Self {
        Self {
            config: Config::default(),
            problem,
        }
    }
}

/// Per-user directory holding the config and state files.
pub fn app_dir() -> Result<PathBuf, AppError> {
    let (var, base) = if cfg!(windows) {
        ("APPDATA", None)
    } else {
        ("HOME", Some(".config"))
    };
    let root =
        std::env::var(var).map_err(|_| AppError::invalid_data(format!("{var} is not set")))?;

    let mut dir = PathBuf::from(root);
    if let Some(base) = base {
        dir.push(base);
    }
    dir.push(APP_DIR_NAME);
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf, AppError> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(app_dir()?.join(CONFIG_FILE_NAME)),
    }
}

pub fn load_config() -> LoadedConfig {
    match config_path() {
        Ok(path) => read_config(&path),
        Err(err) => LoadedConfig::fallback(Some(err)),
    }
}

pub fn read_config(path: &Path) -> LoadedConfig {
    if !path.exists() {
        return LoadedConfig::fallback(None);
    }

    match parse_config(path) {
        Ok(config) => LoadedConfig {
            config,
            problem: None,
        },
        Err(err) => LoadedConfig::fallback(Some(err)),
    }
}

fn parse_config(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content)
        .map_err(|err| AppError::invalid_data(format!("config {}: {}", path.display(), err)))
}
