//! Error types for preprocessing operations.

use std::fmt;

/// Error type for preprocessing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessingError {
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Invalid configuration or argument value.
    InvalidParameter(String),
    /// Required columns are absent at a stage boundary.
    SchemaMismatch {
        stage: String,
        missing: Vec<String>,
    },
    /// A column is present but holds an unexpected data type.
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },
    /// A column's length disagrees with the table's row count.
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
    /// A category value that was not seen during fit.
    UnknownCategory { column: String, value: String },
    /// Data contains missing values where they are not allowed.
    MissingValues(String),
    /// Serialization or deserialization error.
    SerializationError(String),
    /// I/O error during file operations.
    IoError(String),
    /// Malformed CSV input or output failure.
    CsvError(String),
}

impl fmt::Display for PreprocessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessingError::EmptyData(msg) => {
                write!(f, "Empty data: {}", msg)
            }
            PreprocessingError::InvalidParameter(msg) => {
                write!(f, "Invalid parameter: {}", msg)
            }
            PreprocessingError::SchemaMismatch { stage, missing } => {
                write!(
                    f,
                    "Schema mismatch at {}: missing columns [{}]",
                    stage,
                    missing.join(", ")
                )
            }
            PreprocessingError::TypeMismatch {
                column,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Type mismatch in column '{}': expected {}, got {}",
                    column, expected, got
                )
            }
            PreprocessingError::LengthMismatch {
                column,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Length mismatch in column '{}': expected {} rows, got {}",
                    column, expected, got
                )
            }
            PreprocessingError::UnknownCategory { column, value } => {
                write!(f, "Unknown category '{}' in column '{}'", value, column)
            }
            PreprocessingError::MissingValues(msg) => {
                write!(f, "Missing values: {}", msg)
            }
            PreprocessingError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PreprocessingError::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
            PreprocessingError::CsvError(msg) => {
                write!(f, "CSV error: {}", msg)
            }
        }
    }
}

impl std::error::Error for PreprocessingError {}

impl PreprocessingError {
    /// Shorthand for a schema mismatch at `stage`.
    pub fn schema_mismatch(stage: &str, missing: Vec<String>) -> Self {
        PreprocessingError::SchemaMismatch {
            stage: stage.to_string(),
            missing,
        }
    }

    /// Whether this error reports a schema problem (absent or mistyped column).
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            PreprocessingError::SchemaMismatch { .. } | PreprocessingError::TypeMismatch { .. }
        )
    }
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PreprocessingError {
    fn from(err: serde_json::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for PreprocessingError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            PreprocessingError::IoError(err.to_string())
        } else {
            PreprocessingError::CsvError(err.to_string())
        }
    }
}
