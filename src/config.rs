//! Configuration loading and management
//!
//! Handles parsing of `~/.omw/config.toml`. Every field has a default, so a
//! missing file (or missing section) is equivalent to an empty one.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory under the home directory holding omw's files
pub const OMW_DIR: &str = ".omw";

/// Default timesheet file name
pub const DEFAULT_FILE: &str = "omw.toml";

/// Default config file name
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Timesheet storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// External editor used by `omw edit`
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the timesheet file
    #[serde(default = "default_file")]
    pub file: PathBuf,
}

fn default_file() -> PathBuf {
    omw_dir().join(DEFAULT_FILE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
        }
    }
}

/// Editor-related configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// Editor command; falls back to $VISUAL, $EDITOR, then `vi`
    #[serde(default)]
    pub command: Option<String>,

    /// Terminal emulator wrapping the editor (`<terminal> -e <editor>`)
    #[serde(default)]
    pub terminal: Option<String>,

    /// How many times `omw edit` reopens the editor after a retryable failure
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: None,
            terminal: None,
            max_attempts: default_max_attempts(),
        }
    }
}

/// The `~/.omw` directory, or `./.omw` when no home directory is known
pub fn omw_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(OMW_DIR))
        .unwrap_or_else(|| PathBuf::from(OMW_DIR))
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    omw_dir().join(CONFIG_FILE)
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply `$OMW_TERM`, which overrides the configured terminal
    pub fn apply_env(&mut self) {
        if let Ok(term) = std::env::var("OMW_TERM") {
            if !term.trim().is_empty() {
                self.editor.terminal = Some(term.trim().to_string());
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage.file.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.file cannot be empty".to_string(),
            ));
        }
        if self.editor.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "editor.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
