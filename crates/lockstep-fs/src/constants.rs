//! Well-known file names used around project manifests.

use std::path::Path;

/// Manifest extensions recognised when no other list is configured.
pub const DEFAULT_MANIFEST_EXTENSIONS: &[&str] = &["csproj", "vbproj", "fsproj"];

/// Spellings of the registry configuration file, checked in this order.
pub const REGISTRY_CONFIG_NAMES: &[&str] = &["nuget.config", "NuGet.config", "NuGet.Config"];

/// Files with a fixed name relative to a manifest or a cache directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownFile {
    /// The lock artifact written next to each manifest by restore
    LockArtifact,
    /// The registry configuration file (temporary or discovered)
    RegistryConfig,
    /// The cache subdirectory holding temporary registry configurations
    RegistryCacheDir,
}

impl WellKnownFile {
    /// Get the string representation of the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LockArtifact => "packages.lock.json",
            Self::RegistryConfig => "nuget.config",
            Self::RegistryCacheDir => "nuget",
        }
    }
}

impl AsRef<Path> for WellKnownFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WellKnownFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WellKnownFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
