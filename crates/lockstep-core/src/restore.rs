//! Restore orchestration
//!
//! A restore batch runs against a throwaway registry configuration created
//! in its own uniquely named cache directory:
//!
//! 1. one `nuget add source` per registry into the temporary config
//! 2. one `restore` per impacted manifest using that config
//!
//! The directory is removed when the [`TempRegistryConfig`] guard drops,
//! whichever way the batch ends.

use lockstep_fs::{FileSystem, NormalizedPath, WellKnownFile};
use lockstep_graph::ImpactSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::command::RestoreCommand;
use crate::config::UpdateContext;
use crate::host_rules::{CredentialLookup, REGISTRY_HOST_TYPE};
use crate::registry::{RegistrySource, parse_registry_url};
use crate::Result;

/// Content of a freshly created registry configuration.
pub const EMPTY_REGISTRY_CONFIG: &str =
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration>\n</configuration>\n";

/// Source of unique directory names.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> String;
}

/// [`TokenSource`] backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// A temporary registry configuration, removed on drop.
#[derive(Debug)]
pub struct TempRegistryConfig<'a> {
    fs: &'a dyn FileSystem,
    dir: NormalizedPath,
    file: NormalizedPath,
}

impl<'a> TempRegistryConfig<'a> {
    /// Create `<cache_dir>/nuget/<token>/nuget.config` with no sources.
    pub fn create(fs: &'a dyn FileSystem, cache_dir: &NormalizedPath, token: &str) -> Result<Self> {
        let dir = cache_dir.join(WellKnownFile::RegistryCacheDir.as_str()).join(token);
        let file = dir.join(WellKnownFile::RegistryConfig.as_str());

        // Hold the guard before writing so a failed write still cleans up
        let guard = Self { fs, dir, file };
        fs.write_file(&guard.file, EMPTY_REGISTRY_CONFIG)?;
        debug!(config = %guard.file, "Created temporary registry configuration");
        Ok(guard)
    }

    pub fn dir(&self) -> &NormalizedPath {
        &self.dir
    }

    pub fn file(&self) -> &NormalizedPath {
        &self.file
    }
}

impl Drop for TempRegistryConfig<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.fs.remove_dir_all(&self.dir) {
            warn!(dir = %self.dir, error = %e, "Failed to remove temporary registry configuration");
        }
    }
}

/// Builds restore command batches for an impact set.
pub struct RestoreOrchestrator<'a> {
    registries: &'a dyn RegistrySource,
    credentials: &'a dyn CredentialLookup,
}

impl<'a> RestoreOrchestrator<'a> {
    pub fn new(registries: &'a dyn RegistrySource, credentials: &'a dyn CredentialLookup) -> Self {
        Self {
            registries,
            credentials,
        }
    }

    /// Add-source commands for every registry of the changed manifest,
    /// then one restore per impacted manifest.
    pub fn build_commands(
        &self,
        ctx: &UpdateContext,
        impact: &ImpactSet,
        config_file: &NormalizedPath,
    ) -> Result<Vec<RestoreCommand>> {
        let registries = self.registries.registries_for(impact.changed(), &ctx.root_dir)?;
        let mut commands = Vec::with_capacity(registries.len() + impact.len());

        for registry in &registries {
            let credentials = self.credentials.find_credentials(REGISTRY_HOST_TYPE, &registry.url);
            let parsed = parse_registry_url(&registry.url);
            debug!(
                feed = %parsed.feed_url,
                protocol = parsed.protocol_version,
                authenticated = credentials.is_some(),
                "Adding package source"
            );
            commands.push(RestoreCommand::add_source(
                &parsed.feed_url,
                config_file,
                registry.name.as_deref(),
                credentials.as_ref(),
            ));
        }

        commands.extend(
            impact
                .iter()
                .map(|manifest| RestoreCommand::restore(manifest, config_file)),
        );

        info!(
            registries = registries.len(),
            restores = impact.len(),
            "Prepared restore commands"
        );
        Ok(commands)
    }
}
