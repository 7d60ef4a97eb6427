//! Lock artifact snapshots and change detection

use std::collections::BTreeMap;

use lockstep_fs::checksum::compute_content_checksum;
use lockstep_fs::{FileSystem, NormalizedPath, WellKnownFile};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use tracing::debug;

use crate::Result;

/// The lock artifact that restore writes next to `manifest`.
pub fn lock_file_path(manifest: &NormalizedPath) -> NormalizedPath {
    manifest.sibling(WellKnownFile::LockArtifact.as_str())
}

/// Observed state of one lock artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEntry {
    /// First snapshotted manifest that restores into this artifact
    pub manifest: NormalizedPath,
    /// `None` when no lock artifact exists
    pub content: Option<String>,
}

/// Lock artifact contents keyed by lock file path.
///
/// Manifests sharing a directory share one artifact, which is recorded
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockSnapshot {
    entries: BTreeMap<NormalizedPath, LockEntry>,
}

impl LockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the artifact of `manifest` is already recorded.
    pub fn covers(&self, manifest: &NormalizedPath) -> bool {
        self.entries.contains_key(&lock_file_path(manifest))
    }

    /// Record the lock state of `manifest`. The first manifest recorded for
    /// an artifact wins.
    pub fn insert(&mut self, manifest: NormalizedPath, content: Option<String>) {
        self.entries
            .entry(lock_file_path(&manifest))
            .or_insert(LockEntry { manifest, content });
    }

    pub fn get(&self, lock_file: &NormalizedPath) -> Option<&LockEntry> {
        self.entries.get(lock_file)
    }

    /// Whether any artifact in the snapshot exists.
    pub fn any_present(&self) -> bool {
        self.entries.values().any(|entry| entry.content.is_some())
    }

    /// Every snapshotted lock artifact path, each once.
    pub fn lock_files(&self) -> Vec<&NormalizedPath> {
        self.entries.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedPath, &LockEntry)> {
        self.entries.iter()
    }
}

/// Reads lock artifacts through the file system seam.
#[derive(Debug, Clone, Copy)]
pub struct LockArtifacts<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> LockArtifacts<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Read the current lock artifact of every manifest.
    ///
    /// A missing artifact is recorded as absent, not reported as an error.
    pub fn snapshot<'m>(&self, manifests: impl IntoIterator<Item = &'m NormalizedPath>) -> Result<LockSnapshot> {
        let mut snapshot = LockSnapshot::new();
        for manifest in manifests {
            if snapshot.covers(manifest) {
                continue;
            }
            let content = self.fs.read_file(&lock_file_path(manifest))?;
            snapshot.insert(manifest.clone(), content);
        }
        debug!(
            lock_files = snapshot.len(),
            present = snapshot.entries.values().filter(|e| e.content.is_some()).count(),
            "Snapshotted lock files"
        );
        Ok(snapshot)
    }
}

/// Line counts of a lock artifact change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeStats {
    pub insertions: usize,
    pub deletions: usize,
}

impl ChangeStats {
    fn between(before: &str, after: &str) -> Self {
        let mut stats = Self::default();
        for change in TextDiff::from_lines(before, after).iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => stats.insertions += 1,
                ChangeTag::Delete => stats.deletions += 1,
                ChangeTag::Equal => {}
            }
        }
        stats
    }
}

/// A lock artifact whose content differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockChange {
    pub manifest: NormalizedPath,
    pub lock_file: NormalizedPath,
    /// New content; `None` when the artifact was removed
    pub content: Option<String>,
    pub stats: ChangeStats,
    pub checksum_before: Option<String>,
    pub checksum_after: Option<String>,
}

/// Compare two snapshots, reporting every artifact of `before` that
/// changed.
///
/// Appearing and disappearing artifacts count as changes. An artifact
/// missing from `after` is compared as absent.
pub fn diff(before: &LockSnapshot, after: &LockSnapshot) -> Vec<LockChange> {
    before
        .iter()
        .filter_map(|(lock_file, entry)| {
            let new = after.get(lock_file).and_then(|e| e.content.as_deref());
            let old = entry.content.as_deref();
            if old == new {
                return None;
            }

            Some(LockChange {
                manifest: entry.manifest.clone(),
                lock_file: lock_file.clone(),
                content: new.map(str::to_string),
                stats: ChangeStats::between(old.unwrap_or_default(), new.unwrap_or_default()),
                checksum_before: old.map(compute_content_checksum),
                checksum_after: new.map(compute_content_checksum),
            })
        })
        .collect()
}
