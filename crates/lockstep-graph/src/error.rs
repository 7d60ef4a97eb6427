//! Error types for lockstep-graph

use std::path::PathBuf;

/// Result type for lockstep-graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the reference graph
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest text is not well-formed markup
    #[error("Malformed manifest markup: {message}")]
    Markup { message: String },

    /// A discovered manifest could not be parsed
    #[error("Failed to parse manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Filesystem error from lockstep-fs
    #[error(transparent)]
    Fs(#[from] lockstep_fs::Error),
}

impl Error {
    pub(crate) fn markup(message: impl Into<String>) -> Self {
        Self::Markup {
            message: message.into(),
        }
    }
}
