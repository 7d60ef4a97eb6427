//! The top-level lock artifact update

use std::fmt;
use std::sync::Arc;

use lockstep_fs::{FileSystem, LocalFileSystem, NormalizedPath};
use lockstep_graph::{DependencyGraph, GraphBuilder, ImpactResolver, ImpactSet};
use tracing::{debug, info, warn};

use crate::config::{Settings, UpdateContext};
use crate::host_rules::{CredentialLookup, HostRules};
use crate::lockfile::{LockArtifacts, diff};
use crate::process::{LocalProcessRunner, ProcessRunner};
use crate::registry::{NugetConfigRegistries, RegistrySource};
use crate::restore::{RestoreOrchestrator, TempRegistryConfig, TokenSource, UuidTokens};
use crate::types::{UpdateArtifact, UpdateArtifactsResult};
use crate::Result;

/// Steps of an update, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    ManifestFilterCheck,
    ChangeGateCheck,
    GraphBuildAndImpactResolve,
    SnapshotBefore,
    LockPresenceCheck,
    Restore,
    SnapshotAfterAndDiff,
    Done,
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ManifestFilterCheck => "manifest-filter",
            Self::ChangeGateCheck => "change-gate",
            Self::GraphBuildAndImpactResolve => "impact",
            Self::SnapshotBefore => "snapshot-before",
            Self::LockPresenceCheck => "lock-presence",
            Self::Restore => "restore",
            Self::SnapshotAfterAndDiff => "snapshot-after",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Regenerates lock artifacts for a changed manifest and everything that
/// depends on it.
///
/// All outside effects go through the collaborators given at construction;
/// [`ArtifactUpdater::local`] wires up the real ones.
pub struct ArtifactUpdater {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn ProcessRunner>,
    registries: Arc<dyn RegistrySource>,
    credentials: Arc<dyn CredentialLookup>,
    tokens: Arc<dyn TokenSource>,
}

impl ArtifactUpdater {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn ProcessRunner>,
        registries: Arc<dyn RegistrySource>,
        credentials: Arc<dyn CredentialLookup>,
    ) -> Self {
        Self {
            fs,
            runner,
            registries,
            credentials,
            tokens: Arc::new(UuidTokens),
        }
    }

    /// Updater backed by the local disk and local processes.
    pub fn local(settings: &Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem::new());
        let registries = NugetConfigRegistries::new(fs.clone(), settings.default_registries.clone());
        Self::new(
            fs,
            Arc::new(LocalProcessRunner::new()),
            Arc::new(registries),
            Arc::new(HostRules::new(settings.host_rules.clone())),
        )
    }

    /// Use `tokens` to name temporary directories.
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Discover the manifest graph under the context root.
    ///
    /// With an overlay, that manifest's content is taken from memory.
    pub fn build_graph(
        &self,
        ctx: &UpdateContext,
        overlay: Option<(&NormalizedPath, &str)>,
    ) -> Result<DependencyGraph> {
        let mut builder = GraphBuilder::new(self.fs.as_ref(), &ctx.manifest_extensions);
        if let Some((path, content)) = overlay {
            builder = builder.with_overlay(path.clone(), content);
        }
        Ok(builder.build(&ctx.root_dir)?)
    }

    /// The impact set of a manifest as it currently is on disk.
    pub fn resolve_impact(&self, ctx: &UpdateContext, package_file_name: &str) -> Result<ImpactSet> {
        let graph = self.build_graph(ctx, None)?;
        Ok(ImpactResolver::new(&graph).resolve(&ctx.manifest_path(package_file_name)))
    }

    /// Regenerate the lock artifacts affected by a manifest change.
    ///
    /// Returns `Ok(None)` when there is nothing to do: the manifest type is
    /// not supported, nothing changed and no maintenance was requested, no
    /// impacted manifest has a lock artifact, or the restore left every
    /// artifact as it was. A failed restore is reported as a single
    /// [`UpdateArtifactsResult::ArtifactError`].
    ///
    /// # Errors
    ///
    /// Graph discovery failures abort the update. Transient and cancelled
    /// restores are returned as errors so the caller can retry.
    pub async fn update_artifacts(
        &self,
        ctx: &UpdateContext,
        request: &UpdateArtifact,
    ) -> Result<Option<Vec<UpdateArtifactsResult>>> {
        let manifest = ctx.manifest_path(&request.package_file_name);
        info!(manifest = %request.package_file_name, "Updating lock files");

        if !ctx.is_supported_manifest(&manifest) {
            info!(phase = %UpdatePhase::ManifestFilterCheck, "Not updating lock files for non-project files");
            return Ok(None);
        }

        if request.updated_deps.is_empty() && !request.config.is_lock_file_maintenance {
            info!(
                phase = %UpdatePhase::ChangeGateCheck,
                "Not updating lock files because no deps changed and no lock file maintenance"
            );
            return Ok(None);
        }

        debug!(phase = %UpdatePhase::GraphBuildAndImpactResolve, "Resolving impacted manifests");
        let graph = self.build_graph(ctx, Some((&manifest, request.new_package_file_content.as_str())))?;
        let impact = ImpactResolver::new(&graph).resolve(&manifest);

        debug!(phase = %UpdatePhase::SnapshotBefore, manifests = impact.len(), "Reading current lock files");
        let artifacts = LockArtifacts::new(self.fs.as_ref());
        let before = artifacts.snapshot(&impact)?;

        if !before.any_present() {
            info!(phase = %UpdatePhase::LockPresenceCheck, "No lock file found beneath impacted project files");
            return Ok(None);
        }

        debug!(phase = %UpdatePhase::Restore, "Restoring impacted manifests");
        if let Err(e) = self.restore(ctx, &manifest, &request.new_package_file_content, &impact).await {
            if e.must_propagate() {
                return Err(e);
            }
            info!(error = %e, "Failed to generate lock files");
            let lock_files = before
                .lock_files()
                .into_iter()
                .map(|path| ctx.display_path(path))
                .collect();
            return Ok(Some(vec![UpdateArtifactsResult::ArtifactError {
                lock_files,
                stderr: e.failure_text(),
            }]));
        }

        debug!(phase = %UpdatePhase::SnapshotAfterAndDiff, "Comparing lock files");
        let after = artifacts.snapshot(&impact)?;
        let changes = diff(&before, &after);
        if changes.is_empty() {
            info!(phase = %UpdatePhase::Done, "Lock files are unchanged");
            return Ok(None);
        }

        let results = changes
            .into_iter()
            .map(|change| {
                let path = ctx.display_path(&change.lock_file);
                info!(
                    lock_file = %path,
                    insertions = change.stats.insertions,
                    deletions = change.stats.deletions,
                    before = change.checksum_before.as_deref().unwrap_or("absent"),
                    after = change.checksum_after.as_deref().unwrap_or("absent"),
                    "Lock file updated"
                );
                UpdateArtifactsResult::File {
                    path,
                    contents: change.content,
                    stats: change.stats,
                }
            })
            .collect::<Vec<_>>();

        info!(phase = %UpdatePhase::Done, updated = results.len(), "Returning updated lock files");
        Ok(Some(results))
    }

    /// Write the new manifest and run the restore batch.
    ///
    /// The temporary registry configuration is gone when this returns,
    /// whether or not the batch succeeded.
    async fn restore(
        &self,
        ctx: &UpdateContext,
        manifest: &NormalizedPath,
        content: &str,
        impact: &ImpactSet,
    ) -> Result<()> {
        self.fs.write_file(manifest, content)?;

        let token = self.tokens.token();
        let config = TempRegistryConfig::create(self.fs.as_ref(), &ctx.cache_dir, &token)?;
        let commands = RestoreOrchestrator::new(self.registries.as_ref(), self.credentials.as_ref())
            .build_commands(ctx, impact, config.file())?;

        if let Err(e) = self.runner.execute(&commands, &ctx.exec).await {
            warn!(error = %e, "Restore failed");
            return Err(e.into());
        }
        Ok(())
    }
}

impl fmt::Debug for ArtifactUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactUpdater")
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}
