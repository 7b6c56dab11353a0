//! Error types for the chiro CLI
//!
//! Messages are user-facing and say what to check next.

use chiro_common::ChiroError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Curation, inference or export failed
    #[error(transparent)]
    Core(#[from] ChiroError),

    /// A required resource file is missing
    #[error("Resource not found: '{0}'. Check --resources or CHIRO_RESOURCES_DIR.")]
    ResourceNotFound(String),

    /// Lint checks found problems in the curated store
    #[error("Lint failed with {0} finding(s). Fix the lines listed above and run 'chiro lint all' again.")]
    LintFailed(usize),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a resource not found error
    pub fn resource_not_found(path: &std::path::Path) -> Self {
        Self::ResourceNotFound(path.display().to_string())
    }
}
