//! Error types for chiro

use thiserror::Error;

/// Result type alias for chiro operations
pub type Result<T> = std::result::Result<T, ChiroError>;

/// Main error type for chiro
#[derive(Error, Debug)]
pub enum ChiroError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    /// A row with the wrong shape. `line` is 1-based.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Unknown {kind}: '{value}'")]
    UnknownVocabulary { kind: &'static str, value: String },

    #[error("Invalid identifier {namespace}:{identifier}: {reason}")]
    InvalidIdentifier {
        namespace: String,
        identifier: String,
        reason: String,
    },

    #[error("Grounding service error: {0}")]
    Grounding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ChiroError {
    /// Create a malformed record error
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create an unknown vocabulary error
    pub fn unknown_vocabulary(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVocabulary {
            kind,
            value: value.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidIdentifier {
            namespace: namespace.into(),
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error must turn into a non-zero exit code.
    ///
    /// Lookup misses and service failures are logged and skipped instead,
    /// so they never reach this point as errors.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Grounding(_) | Self::Http(_))
    }
}
