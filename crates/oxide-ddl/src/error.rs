//! Error types for plan loading and rendering.

use std::path::PathBuf;

use oxide_ddl_core::error::DdlError;

/// Errors that can occur while loading or rendering a plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The plan file could not be read.
    #[error("Failed to read plan '{path}': {source}")]
    Io {
        /// Path to the plan file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The plan file is not a valid plan.
    #[error("Failed to parse plan '{path}': {source}")]
    Parse {
        /// Path to the plan file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A schema change could not be validated or rendered.
    #[error("Change #{index} ({operation}) failed: {source}")]
    Change {
        /// Zero-based position of the change in the plan.
        index: usize,
        /// Operation name of the change.
        operation: &'static str,
        /// Underlying error.
        source: DdlError,
    },

    /// Dialect lookup or other synthesis error.
    #[error(transparent)]
    Ddl(#[from] DdlError),
}

/// Result type for plan operations.
pub type Result<T> = std::result::Result<T, PlanError>;
