use crate::array::{Kind, Shape};
use crate::validation::ValidationReport;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of a failure, used when reporting it at the top level
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Invalid numeric domain, incompatible shapes or malformed input
    Value,
    /// Dubious but tolerable input
    Warning,
    /// Files that could not be read or written
    Io,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorClass::Value => "ValueError",
            ErrorClass::Warning => "RuntimeWarning",
            ErrorClass::Io => "IOError",
        };
        write!(f, "{name}")
    }
}

/// Error type for invalid calculations.
#[derive(Error, Debug)]
pub enum QoError {
    /// At least one fatal validation violation (advisories may be included)
    #[error("{0}")]
    InvalidValue(ValidationReport),
    /// Only advisory validation violations
    #[error("{0}")]
    DubiousValue(ValidationReport),
    #[error("operands could not be broadcast together with shapes {0} {1}")]
    ShapeMismatch(Shape, Shape),
    #[error("Division by zero for {expression} at indices {indices:?}")]
    DivisionByZero {
        expression: String,
        indices: Vec<usize>,
    },
    #[error("Received {parameter} data type kind: {kind}")]
    UnsupportedKind { parameter: String, kind: Kind },
    #[error("Received name headings = {received:?}\nExpected name headings = {expected:?}")]
    ColumnMismatch {
        received: Vec<String>,
        expected: Vec<String>,
    },
    #[error("Received invalid entries in {path} (line {line}): {details}")]
    InvalidInputFile {
        path: String,
        line: usize,
        details: String,
    },
    #[error("Failed to read delimited input {path}")]
    Delimited {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    #[error("Could not access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid run configuration in {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid log entry format {template:?}: {reason}")]
    LogFormat { template: String, reason: String },
}

impl QoError {
    pub fn class(&self) -> ErrorClass {
        match self {
            QoError::DubiousValue(_) => ErrorClass::Warning,
            QoError::Io { .. } | QoError::Config { .. } => ErrorClass::Io,
            _ => ErrorClass::Value,
        }
    }

    /// Whether the failure may be logged and otherwise ignored
    pub fn is_advisory(&self) -> bool {
        self.class() == ErrorClass::Warning
    }
}

/// Convenience type for `Result<T, QoError>`.
pub type QoResult<T> = Result<T, QoError>;
