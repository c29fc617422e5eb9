//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MulticamError, MulticamResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where clip records are read from.
    pub source: SourceConfig,

    /// Global timeline framerate (e.g. "25", "29.97", "23.976").
    pub framerate: String,

    /// Path of the generated XML document.
    pub output: PathBuf,

    /// Template overrides.
    pub templates: TemplateConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Clip record database settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// SQLite database file.
    pub database: PathBuf,

    /// Table holding one row per recorded clip.
    pub table: String,
}

/// Template file overrides. `None` selects the built-in template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Base document containing the `sequence` node.
    pub sequence: Option<PathBuf>,

    /// Fragment rooted at `clipitem`.
    pub clip: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "multicam=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            framerate: "25".to_string(),
            output: PathBuf::from("output.xml"),
            templates: TemplateConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("clips.db"),
            table: "tracks".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from `path` (usually [`config_file_path`]), falling back
    /// to defaults. A missing file is not an error; any other failure is
    /// returned alongside the defaults, since this usually runs before
    /// logging is set up.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<MulticamError>) {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(MulticamError::config(format!(
                    "Failed to load config at {}: {e}",
                    path.display()
                ))),
            ),
        }
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load_or_default`], any
    /// read or parse failure is returned to the caller.
    pub fn load_from(path: impl AsRef<Path>) -> MulticamResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MulticamError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            MulticamError::config(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> MulticamResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check the fields that cannot be validated by deserialization alone.
    pub fn validate(&self) -> MulticamResult<()> {
        if self.framerate.trim().is_empty() {
            return Err(MulticamError::config("framerate must not be empty"));
        }
        if !is_sql_identifier(&self.source.table) {
            return Err(MulticamError::config(format!(
                "table name {:?} is not a plain SQL identifier",
                self.source.table
            )));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("multicam").join("config.json")
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
