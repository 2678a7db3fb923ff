//! Error handling for the wavg host
//!
//! Script configuration problems come from `wavg-calculator` and are wrapped here next
//! to the host's own failure modes (bad scan settings, malformed document files), so
//! callers deal with one error type per request.

use thiserror::Error;
use wavg_calculator::ScriptError;

/// Error type for host operations
#[derive(Error, Debug)]
pub enum WavgError {
    /// Script construction failed; fatal to the request
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Scan or loader settings are unusable
    #[error("Configuration error: {message}")]
    Configuration { message: String, setting: Option<String> },

    /// A document could not be read into the collection
    #[error("Document error: {message}")]
    Document { message: String, document_index: Option<usize> },

    /// JSON or TOML input could not be parsed
    #[error("Serialization error: {message}")]
    Serialization { message: String, data_type: Option<String> },

    /// File system failures
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Worker pool failures
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WavgError {
    pub fn configuration(message: impl Into<String>, setting: impl Into<String>) -> Self {
        WavgError::Configuration { message: message.into(), setting: Some(setting.into()) }
    }

    pub fn document(message: impl Into<String>, document_index: usize) -> Self {
        WavgError::Document { message: message.into(), document_index: Some(document_index) }
    }

    pub fn serialization(message: impl Into<String>, data_type: &str) -> Self {
        WavgError::Serialization { message: message.into(), data_type: Some(data_type.to_string()) }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            WavgError::Script(_) => "script",
            WavgError::Configuration { .. } => "configuration",
            WavgError::Document { .. } => "document",
            WavgError::Serialization { .. } => "serialization",
            WavgError::Io { .. } => "io",
            WavgError::Internal { .. } => "internal",
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WavgError::Script(_) => ErrorSeverity::High,
            WavgError::Configuration { .. } => ErrorSeverity::Critical,
            WavgError::Document { .. } => ErrorSeverity::Medium,
            WavgError::Serialization { .. } => ErrorSeverity::Medium,
            WavgError::Io { .. } => ErrorSeverity::High,
            WavgError::Internal { .. } => ErrorSeverity::Critical,
        }
    }
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

pub type WavgResult<T> = Result<T, WavgError>;
