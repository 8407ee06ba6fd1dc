//! Run configuration
//!
//! Settings shared by every calculator invocation. Values come from defaults,
//! optionally overridden by a TOML file, and finally by command-line flags.
//!
//! ```toml
//! validate = true
//! verbosity = 2
//! log_file = "ring_damping.log"
//! log_entry_format = "{level} {message}"
//! ```

use crate::errors::{QoError, QoResult};
use crate::logging::{level_for_verbosity, EntryFormat, LogSettings, DEFAULT_ENTRY_FORMAT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one calculator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Validate inputs before calculating
    ///
    /// Default: false
    pub validate: bool,

    /// Number of `-v` flags (0 = errors only, 3+ = debug)
    ///
    /// Default: 0
    pub verbosity: u8,

    /// File that receives a copy of every log entry
    ///
    /// Default: `<calculator>.log` in the working directory
    pub log_file: Option<PathBuf>,

    /// Template for log entries
    ///
    /// Default: `{time} {level} [{target}] {message}`
    pub log_entry_format: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            validate: false,
            verbosity: 0,
            log_file: None,
            log_entry_format: DEFAULT_ENTRY_FORMAT.to_string(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(contents: &str, origin: &Path) -> QoResult<Self> {
        toml::from_str(contents).map_err(|source| QoError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_file(path: &Path) -> QoResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| QoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Logging context for a run of the named calculator
    pub fn log_settings(&self, calculator: &str) -> QoResult<LogSettings> {
        Ok(LogSettings {
            level: level_for_verbosity(self.verbosity),
            log_file: Some(
                self.log_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(format!("{calculator}.log"))),
            ),
            entry_format: EntryFormat::parse(&self.log_entry_format)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert!(!config.validate);
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.log_entry_format, DEFAULT_ENTRY_FORMAT);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RunConfig::from_toml_str("validate = true\nverbosity = 2\n", Path::new("run.toml"))
            .unwrap();
        assert!(config.validate);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.log_file, None);
        assert_eq!(config.log_entry_format, DEFAULT_ENTRY_FORMAT);
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = RunConfig::from_toml_str("validat = true", Path::new("run.toml")).unwrap_err();
        assert!(matches!(err, QoError::Config { .. }));
        assert!(err.to_string().contains("run.toml"));
    }

    #[test]
    fn test_log_settings_default_file_name() {
        let settings = RunConfig {
            verbosity: 2,
            ..RunConfig::default()
        }
        .log_settings("ring_damping")
        .unwrap();
        assert_eq!(settings.level, LevelFilter::INFO);
        assert_eq!(settings.log_file, Some(PathBuf::from("ring_damping.log")));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "log_entry_format = \"{level} {message}\"\n").unwrap();
        let config = RunConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.log_entry_format, "{level} {message}");

        let missing = RunConfig::from_toml_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, QoError::Io { .. }));
    }
}
