//! Core error types for weekplan-core.
//!
//! Field-level failures (time parsing, answer coercion) surface immediately
//! to the caller of that operation. Placement shortfalls are not errors:
//! they are reported in [`crate::scheduler::AllocationResult::unplaced`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for weekplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A clock time could not be split into hour and minute components
    #[error("Invalid time format: '{value}' (expected HH:MM)")]
    InvalidTimeFormat { value: String },

    /// An answer value could not be coerced to the type its field requires
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidAnswerValue {
        field: String,
        value: String,
        reason: String,
    },

    /// An answer referenced an entity that does not exist in the draft
    #[error("No meeting or task matches answer target '{target}'")]
    AnswerTargetNotFound { target: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The external text parser produced something unusable
    #[error("Parser error: {message}")]
    Parser { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn invalid_time(value: impl Into<String>) -> Self {
        CoreError::InvalidTimeFormat {
            value: value.into(),
        }
    }

    pub(crate) fn invalid_answer(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CoreError::InvalidAnswerValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine where configuration lives
    #[error("Cannot resolve data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Imported calendar does not have the expected shape
    #[error("Invalid calendar: {0}")]
    InvalidCalendar(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
