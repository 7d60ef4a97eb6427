//! External process execution

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use lockstep_fs::NormalizedPath;
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::RestoreCommand;

/// How a restore batch is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory for every command
    pub cwd: NormalizedPath,

    /// Isolation image hint; runners without container support only log it
    pub image: Option<String>,

    /// Limit for the whole batch
    pub timeout: Option<Duration>,
}

/// Errors reported by a [`ProcessRunner`].
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed (exit code {code}): {stderr}")]
    Failed { code: i32, stderr: String },

    /// Environment problem worth retrying later
    #[error("Temporary failure: {0}")]
    Transient(String),

    #[error("Timed out after {0:?}")]
    TimedOut(Duration),
}

/// Runs a batch of commands as one unit.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run every command in order, stopping at the first failure.
    async fn execute(&self, commands: &[RestoreCommand], options: &ExecOptions) -> Result<(), ExecError>;
}

/// [`ProcessRunner`] that spawns local processes.
///
/// Children are killed when the future driving them is dropped, so a
/// cancelled or timed-out batch leaves no process behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProcessRunner;

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, command: &RestoreCommand, options: &ExecOptions) -> Result<(), ExecError> {
        debug!(command = %command, cwd = %options.cwd, "Running command");

        let output = Command::new(&command.program)
            .args(command.argv())
            .current_dir(options.cwd.to_native())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        // No exit code means the child was killed by a signal
        let Some(code) = output.status.code() else {
            return Err(ExecError::Transient(format!("{} was terminated by a signal", command.program)));
        };

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        Err(ExecError::Failed { code, stderr })
    }
}

#[async_trait]
impl ProcessRunner for LocalProcessRunner {
    async fn execute(&self, commands: &[RestoreCommand], options: &ExecOptions) -> Result<(), ExecError> {
        if let Some(image) = &options.image {
            info!(image = %image, "Running without container isolation");
        }

        let batch = async {
            for command in commands {
                self.run(command, options).await?;
            }
            Ok(())
        };

        match options.timeout {
            Some(limit) => tokio::time::timeout(limit, batch)
                .await
                .map_err(|_| ExecError::TimedOut(limit))?,
            None => batch.await,
        }
    }
}
