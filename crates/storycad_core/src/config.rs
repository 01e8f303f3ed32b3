//! Core configuration loaded by host applications.
//!
//! # Responsibility
//! - Decode optional JSON settings for logging and document defaults.
//! - Validate settings before any of them take effect.
//!
//! # Invariants
//! - Every field is optional; missing fields fall back to build defaults.
//! - Unknown fields are rejected so typos surface early.

use crate::logging::{self, default_log_level};
use crate::model::element::normalize_name;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default display name of the Narrator view root.
pub const DEFAULT_NARRATOR_VIEW_NAME: &str = "Narrative View";
/// Default display name of the Trash view root.
pub const DEFAULT_TRASH_NAME: &str = "Deleted Story Elements";

/// Configuration loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file cannot be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config text is not valid JSON for `CoreConfig`.
    Parse(serde_json::Error),
    /// Log level or directory is unusable.
    InvalidLogging(String),
    /// A configured view name is blank.
    BlankName(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidLogging(message) => write!(f, "invalid logging config: {message}"),
            Self::BlankName(field) => write!(f, "config field `{field}` must not be blank"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidLogging(_) | Self::BlankName(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Names used when a new document creates its view roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    pub narrator_view_name: String,
    pub trash_name: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            narrator_view_name: DEFAULT_NARRATOR_VIEW_NAME.to_string(),
            trash_name: DEFAULT_TRASH_NAME.to_string(),
        }
    }
}

/// Top-level core settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. Logging stays off when absent.
    pub log_dir: Option<PathBuf>,
    pub narrator_view_name: String,
    pub trash_name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            narrator_view_name: DEFAULT_NARRATOR_VIEW_NAME.to_string(),
            trash_name: DEFAULT_TRASH_NAME.to_string(),
        }
    }
}

impl CoreConfig {
    /// Decodes and validates JSON config text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, decodes and validates one JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks level, directory and names without side effects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        logging::normalize_level(&self.log_level).map_err(ConfigError::InvalidLogging)?;
        if let Some(dir) = &self.log_dir {
            logging::normalize_log_dir(dir).map_err(ConfigError::InvalidLogging)?;
        }
        if self.narrator_view_name.trim().is_empty() {
            return Err(ConfigError::BlankName("narrator_view_name"));
        }
        if self.trash_name.trim().is_empty() {
            return Err(ConfigError::BlankName("trash_name"));
        }
        Ok(())
    }

    /// View root names for new documents, whitespace-normalized.
    pub fn document_config(&self) -> Result<DocumentConfig, ConfigError> {
        Ok(DocumentConfig {
            narrator_view_name: normalize_name(self.narrator_view_name.clone())
                .map_err(|_| ConfigError::BlankName("narrator_view_name"))?,
            trash_name: normalize_name(self.trash_name.clone())
                .map_err(|_| ConfigError::BlankName("trash_name"))?,
        })
    }

    /// Starts logging when a directory is configured.
    ///
    /// Returns `Ok(false)` when logging is not configured.
    pub fn init_logging(&self) -> Result<bool, ConfigError> {
        let Some(dir) = &self.log_dir else {
            return Ok(false);
        };
        logging::init_logging(&self.log_level, dir).map_err(ConfigError::InvalidLogging)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_NARRATOR_VIEW_NAME, DEFAULT_TRASH_NAME};
    use crate::logging::default_log_level;

    #[test]
    fn empty_object_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert_eq!(config.narrator_view_name, DEFAULT_NARRATOR_VIEW_NAME);
        assert_eq!(config.trash_name, DEFAULT_TRASH_NAME);
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = CoreConfig::from_json_str(r#"{"log_levle": "info"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_bad_level_and_relative_dir() {
        let err = CoreConfig::from_json_str(r#"{"log_level": "loud"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogging(_)));

        let err = CoreConfig::from_json_str(r#"{"log_dir": "relative/logs"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogging(message) if message.contains("absolute")));
    }

    #[test]
    fn document_config_normalizes_names() {
        let config =
            CoreConfig::from_json_str(r#"{"narrator_view_name": "  Reading   Order "}"#).unwrap();
        let document = config.document_config().unwrap();
        assert_eq!(document.narrator_view_name, "Reading Order");
        assert_eq!(document.trash_name, DEFAULT_TRASH_NAME);

        let err = CoreConfig::from_json_str(r#"{"trash_name": "   "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::BlankName("trash_name")));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoreConfig::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
