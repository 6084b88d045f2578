//! Error types for resonance-guard
//!
//! All run-level operations return `ResonanceResult<T>`. Failures local to a
//! single input file never surface here; they are captured in that file's
//! `FileResult` instead.

use crate::report::RunOutcome;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resonance-guard operations
pub type ResonanceResult<T> = Result<T, ResonanceError>;

/// All run-level errors
#[derive(Error, Debug)]
pub enum ResonanceError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigValue { key: String, reason: String },

    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(String),

    #[error("Failed to read reference text {path}: {source}")]
    ReferenceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Schema errors
    #[error("Report does not conform to schema {version}: {details}")]
    SchemaValidation { version: String, details: String },

    #[error("Embedded schema {version} could not be compiled: {reason}")]
    SchemaCompile { version: String, reason: String },

    // Discovery errors
    #[error("Invalid glob pattern {pattern}: {reason}")]
    GlobInvalid { pattern: String, reason: String },

    // Cache errors
    #[error("Failed to clear cache directory {path}: {source}")]
    CacheClear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ResonanceError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a configuration value error
    pub fn config_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Exit status reported for this error.
    ///
    /// Every run-level error is unrelated to scoring outcomes, so they all
    /// share the error code.
    pub fn exit_status(&self) -> RunOutcome {
        RunOutcome::Error
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigInvalid { .. } => Some("Check .resonance.toml for typos or wrong value types"),
            Self::UnsupportedSchema(_) => Some("Supported schema versions: 1.1, 1.2"),
            Self::GlobInvalid { .. } => Some("Quote glob patterns so the shell does not expand them"),
            Self::ReferenceRead { .. } => Some("Pass an existing file to --reference"),
            _ => None,
        }
    }
}
