//! Error types for lockstep-core

use std::path::PathBuf;

use crate::process::ExecError;

/// Result type for lockstep-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while updating lock artifacts
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A registry configuration file could not be parsed
    #[error("Failed to read registry configuration {path}: {message}")]
    RegistryConfig { path: PathBuf, message: String },

    /// The restore process failed
    #[error(transparent)]
    Restore(ExecError),

    /// Retryable environment failure; the caller's retry policy applies
    #[error("Temporary infrastructure failure: {0}")]
    Transient(String),

    /// The restore was cut short before it could finish
    #[error("Restore cancelled: {reason}")]
    Cancelled { reason: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from lockstep-fs
    #[error(transparent)]
    Fs(#[from] lockstep_fs::Error),

    /// Graph discovery error from lockstep-graph
    #[error(transparent)]
    Graph(#[from] lockstep_graph::Error),
}

impl Error {
    /// Whether this error must reach the caller instead of being reported
    /// as an artifact error.
    pub fn must_propagate(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Cancelled { .. })
    }

    /// Text reported to the host for a failed restore.
    ///
    /// For a process that ran and failed this is its raw error output.
    pub fn failure_text(&self) -> String {
        match self {
            Self::Restore(ExecError::Failed { stderr, .. }) if !stderr.is_empty() => stderr.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ExecError> for Error {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Transient(message) => Self::Transient(message),
            ExecError::TimedOut(limit) => Self::Cancelled {
                reason: format!("timed out after {}s", limit.as_secs()),
            },
            other => Self::Restore(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_transient_exec_error_propagates() {
        let err = Error::from(ExecError::Transient("registry throttled".into()));
        assert!(matches!(err, Error::Transient(_)));
        assert!(err.must_propagate());
    }

    #[test]
    fn test_timeout_becomes_cancellation() {
        let err = Error::from(ExecError::TimedOut(Duration::from_secs(30)));
        assert!(err.must_propagate());
        assert_eq!(err.to_string(), "Restore cancelled: timed out after 30s");
    }

    #[test]
    fn test_failed_exec_reports_raw_stderr() {
        let err = Error::from(ExecError::Failed {
            code: 1,
            stderr: "network unreachable".into(),
        });
        assert!(!err.must_propagate());
        assert_eq!(err.failure_text(), "network unreachable");
    }

    #[test]
    fn test_failed_exec_without_output_uses_display() {
        let err = Error::from(ExecError::Failed {
            code: 3,
            stderr: String::new(),
        });
        assert_eq!(err.failure_text(), "Command failed (exit code 3): ");
    }
}
