//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lockstep - Keep project lock files in step with manifest changes
#[derive(Parser, Debug)]
#[command(name = "lockstep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Regenerate the lock files affected by a manifest change
    ///
    /// Restores the changed manifest and every manifest that references it,
    /// then reports the lock files whose content changed.
    ///
    /// Examples:
    ///   lockstep update src/Lib/Lib.csproj --dep Newtonsoft.Json
    ///   lockstep update App.csproj --content App.new.csproj --dep Serilog
    ///   lockstep update App.csproj --maintenance --json
    Update {
        /// The changed manifest, relative to the root
        manifest: PathBuf,

        /// Root of the source tree (defaults to the current directory)
        #[arg(long, env = "LOCKSTEP_ROOT")]
        root: Option<PathBuf>,

        /// File holding the new manifest content (defaults to the manifest itself)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Name of a dependency that changed; repeatable
        #[arg(long)]
        dep: Vec<String>,

        /// Regenerate even when no dependency changed
        #[arg(long)]
        maintenance: bool,

        /// Settings file (TOML, JSON or YAML)
        #[arg(long, env = "LOCKSTEP_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the manifests affected by a change to MANIFEST
    Impact {
        /// The manifest to analyse, relative to the root
        manifest: PathBuf,

        /// Root of the source tree (defaults to the current directory)
        #[arg(long, env = "LOCKSTEP_ROOT")]
        root: Option<PathBuf>,

        /// Settings file (TOML, JSON or YAML)
        #[arg(long, env = "LOCKSTEP_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the manifest reference graph
    Graph {
        /// Root of the source tree (defaults to the current directory)
        #[arg(long, env = "LOCKSTEP_ROOT")]
        root: Option<PathBuf>,

        /// Settings file (TOML, JSON or YAML)
        #[arg(long, env = "LOCKSTEP_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
