//! Restore command assembly
//!
//! Commands are argument vectors handed to the process runner as-is; no
//! shell is involved, so nothing here quotes or escapes.

use std::fmt;

use lockstep_fs::NormalizedPath;

use crate::host_rules::Credentials;

/// Program every restore command invokes.
pub const DOTNET: &str = "dotnet";

/// A single command-line argument.
#[derive(Clone, PartialEq, Eq)]
pub enum CommandArg {
    Plain(String),
    /// Passed to the process but never displayed or logged
    Secret(String),
}

impl CommandArg {
    /// The value handed to the process.
    pub fn value(&self) -> &str {
        match self {
            Self::Plain(value) | Self::Secret(value) => value,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Secret(_))
    }
}

impl fmt::Display for CommandArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.write_str(value),
            Self::Secret(_) => f.write_str("***"),
        }
    }
}

impl fmt::Debug for CommandArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl From<&str> for CommandArg {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for CommandArg {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<&NormalizedPath> for CommandArg {
    fn from(value: &NormalizedPath) -> Self {
        Self::Plain(value.to_native().to_string_lossy().into_owned())
    }
}

/// One external command in a restore batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreCommand {
    pub program: String,
    pub args: Vec<CommandArg>,
}

impl RestoreCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<CommandArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Register `feed_url` as a package source in `config_file`.
    pub fn add_source(
        feed_url: &str,
        config_file: &NormalizedPath,
        name: Option<&str>,
        credentials: Option<&Credentials>,
    ) -> Self {
        let mut command = Self::new(DOTNET)
            .arg("nuget")
            .arg("add")
            .arg("source")
            .arg(feed_url)
            .arg("--configfile")
            .arg(config_file);

        if let Some(name) = name {
            command = command.arg("--name").arg(name);
        }
        if let Some(credentials) = credentials {
            command = command
                .arg("--username")
                .arg(credentials.username.as_str())
                .arg("--password")
                .arg(CommandArg::Secret(credentials.password.clone()))
                .arg("--store-password-in-clear-text");
        }
        command
    }

    /// Restore `manifest` against the sources in `config_file`.
    pub fn restore(manifest: &NormalizedPath, config_file: &NormalizedPath) -> Self {
        Self::new(DOTNET)
            .arg("restore")
            .arg(manifest)
            .arg("--force-evaluate")
            .arg("--configfile")
            .arg(config_file)
    }

    /// Argument values as passed to the process, program excluded.
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(CommandArg::value)
    }
}

impl fmt::Display for RestoreCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
