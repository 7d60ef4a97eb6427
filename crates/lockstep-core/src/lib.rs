//! Lock file regeneration for multi-project source trees
//!
//! Given a changed project manifest, this crate works out which manifests
//! depend on it, runs an external restore for each of them, and reports the
//! lock files whose content actually changed.
//!
//! The entry point is [`ArtifactUpdater::update_artifacts`]. Everything the
//! updater touches outside the process goes through a collaborator trait:
//!
//! - [`lockstep_fs::FileSystem`] for reading and writing files
//! - [`ProcessRunner`] for the restore invocation
//! - [`RegistrySource`] for package registry discovery
//! - [`CredentialLookup`] for registry credentials
//! - [`TokenSource`] for unique temporary directory names

pub mod command;
pub mod config;
pub mod error;
pub mod host_rules;
pub mod lockfile;
pub mod process;
pub mod registry;
pub mod restore;
pub mod types;
pub mod updater;

pub use command::{CommandArg, RestoreCommand};
pub use config::{Settings, UpdateContext};
pub use error::{Error, Result};
pub use host_rules::{CredentialLookup, Credentials, HostRule, HostRules};
pub use lockfile::{ChangeStats, LockArtifacts, LockChange, LockEntry, LockSnapshot, diff, lock_file_path};
pub use process::{ExecError, ExecOptions, LocalProcessRunner, ProcessRunner};
pub use registry::{NugetConfigRegistries, Registry, RegistrySource, RegistryUrl, parse_registry_url};
pub use restore::{RestoreOrchestrator, TempRegistryConfig, TokenSource, UuidTokens};
pub use types::{UpdateArtifact, UpdateArtifactsConfig, UpdateArtifactsResult, UpdatedDependency};
pub use updater::{ArtifactUpdater, UpdatePhase};
