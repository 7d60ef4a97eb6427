//! Request and result types of an artifact update

use serde::{Deserialize, Serialize};

use crate::lockfile::ChangeStats;

/// A dependency whose version changed in the manifest update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedDependency {
    pub dep_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
}

impl UpdatedDependency {
    pub fn new(dep_name: impl Into<String>) -> Self {
        Self {
            dep_name: dep_name.into(),
            new_version: None,
        }
    }
}

/// Flags controlling an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateArtifactsConfig {
    /// Regenerate lock files even when no dependency changed
    #[serde(default)]
    pub is_lock_file_maintenance: bool,
}

/// A manifest change whose lock artifacts should be regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateArtifact {
    /// Changed manifest, relative to the root directory or absolute
    pub package_file_name: String,
    pub new_package_file_content: String,
    pub config: UpdateArtifactsConfig,
    pub updated_deps: Vec<UpdatedDependency>,
}

/// One entry of an update's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UpdateArtifactsResult {
    /// A lock artifact whose content changed
    File {
        /// Path relative to the root directory
        path: String,
        /// New content; `None` if the artifact was deleted
        contents: Option<String>,
        stats: ChangeStats,
    },

    /// The restore failed for the impacted lock artifacts
    ArtifactError {
        lock_files: Vec<String>,
        stderr: String,
    },
}

impl UpdateArtifactsResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ArtifactError { .. })
    }
}
