//! Application configuration file.
//!
//! # Responsibility
//! - Load `config.json` from the application config directory.
//! - Write defaults when the file does not exist yet.
//! - Apply key/value updates coming from front ends.
//!
//! # Invariants
//! - Missing keys fall back to defaults on load.
//! - Unknown update keys are logged and ignored, never fatal.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory name under the platform config root.
pub const APP_DIR_NAME: &str = "CodeHive";
pub const CONFIG_FILE_NAME: &str = "config.json";
const DATABASE_FILE_NAME: &str = "projects.db";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    /// Platform has no known configuration directory.
    NoConfigDir,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "no configuration directory available"),
            Self::Io { path, source } => {
                write!(f, "config file `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config file `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoConfigDir => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: String,
    pub default_project_paths: Vec<String>,
    /// Editor executable override; empty uses the platform launch command.
    pub vscode_path: String,
    pub theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let database_path = default_config_dir()
            .map(|dir| dir.join(DATABASE_FILE_NAME))
            .unwrap_or_else(|_| PathBuf::from(DATABASE_FILE_NAME));
        Self::with_database_path(database_path)
    }
}

impl AppConfig {
    /// Defaults rooted at an explicit config directory.
    pub fn defaults_in(config_dir: &Path) -> Self {
        Self::with_database_path(config_dir.join(DATABASE_FILE_NAME))
    }

    fn with_database_path(database_path: PathBuf) -> Self {
        let default_project_paths = dirs::home_dir()
            .map(|home| vec![home.join("Projects").to_string_lossy().into_owned()])
            .unwrap_or_default();
        Self {
            database_path: database_path.to_string_lossy().into_owned(),
            default_project_paths,
            vscode_path: String::new(),
            theme: "default".to_string(),
        }
    }

    /// Loads `config.json` from `config_dir`, writing defaults if absent.
    pub fn load_or_init(config_dir: &Path) -> ConfigResult<Self> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Io {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let file = config_dir.join(CONFIG_FILE_NAME);
        if !file.exists() {
            let config = Self::defaults_in(config_dir);
            config.save(config_dir)?;
            info!(
                "event=config_init module=config status=ok path={}",
                file.display()
            );
            return Ok(config);
        }

        let raw = std::fs::read_to_string(&file).map_err(|source| ConfigError::Io {
            path: file.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: file, source })
    }

    /// Writes this config as pretty JSON into `config_dir`.
    pub fn save(&self, config_dir: &Path) -> ConfigResult<()> {
        let file = config_dir.join(CONFIG_FILE_NAME);
        let data = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: file.clone(),
            source,
        })?;
        std::fs::write(&file, data).map_err(|source| ConfigError::Io { path: file, source })
    }

    /// Applies known keys from `updates` and returns the ignored keys.
    ///
    /// Values of the wrong JSON type are ignored as well. Nothing is saved.
    pub fn apply_updates(&mut self, updates: &Map<String, Value>) -> Vec<String> {
        let mut ignored = Vec::new();
        for (key, value) in updates {
            let applied = match key.as_str() {
                "database_path" => set_string(&mut self.database_path, value),
                "vscode_path" => set_string(&mut self.vscode_path, value),
                "theme" => set_string(&mut self.theme, value),
                "default_project_paths" => match string_list(value) {
                    Some(paths) => {
                        self.default_project_paths = paths;
                        true
                    }
                    None => false,
                },
                _ => {
                    warn!("event=config_update module=config status=warn unknown_key={key}");
                    false
                }
            };
            if !applied {
                ignored.push(key.clone());
            }
        }
        ignored
    }
}

/// Platform config directory for this application.
pub fn default_config_dir() -> ConfigResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

fn set_string(target: &mut String, value: &Value) -> bool {
    match value.as_str() {
        Some(text) => {
            *target = text.to_string();
            true
        }
        None => false,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
