//! Configuration errors raised while building scripts from request parameters.
//!
//! Missing field values are never errors; they surface as `None` from the formula.

use thiserror::Error;

/// Error type for script construction and lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// A required parameter was absent from the parameter bag
    #[error("cannot initialize {script}: required parameter '{parameter}' is missing")]
    MissingParameter { script: String, parameter: String },

    /// A parameter was present but had the wrong shape
    #[error("cannot initialize {script}: parameter '{parameter}' must be {expected}, got {actual}")]
    InvalidParameter { script: String, parameter: String, expected: String, actual: String },

    /// `fields` and `weights` were both supplied with different lengths
    #[error("fields and weights must have the same length ({fields} fields, {weights} weights)")]
    LengthMismatch { fields: usize, weights: usize },

    /// The `policy` parameter named no known accumulation policy
    #[error("unknown accumulation policy '{0}'")]
    UnknownPolicy(String),

    /// No constructor is registered under the requested name
    #[error("script '{0}' is not registered")]
    UnknownScript(String),

    /// The script exists but is not the kind the caller asked for
    #[error("script '{name}' is a {actual} script, expected {expected}")]
    WrongKind { name: String, expected: &'static str, actual: &'static str },
}

impl ScriptError {
    /// Short category label used in structured logs
    pub fn category(&self) -> &'static str {
        match self {
            ScriptError::MissingParameter { .. } => "missing_parameter",
            ScriptError::InvalidParameter { .. } => "invalid_parameter",
            ScriptError::LengthMismatch { .. } => "length_mismatch",
            ScriptError::UnknownPolicy(_) => "unknown_policy",
            ScriptError::UnknownScript(_) => "unknown_script",
            ScriptError::WrongKind { .. } => "wrong_kind",
        }
    }
}

pub type ScriptResult<T> = Result<T, ScriptError>;
