//! Settings and the per-invocation update context

use std::path::PathBuf;
use std::time::Duration;

use lockstep_fs::constants::DEFAULT_MANIFEST_EXTENSIONS;
use lockstep_fs::{ConfigStore, NormalizedPath};
use serde::Deserialize;

use crate::host_rules::HostRule;
use crate::process::ExecOptions;
use crate::registry::Registry;
use crate::Result;

/// Feed used when a manifest has no registry configuration of its own.
pub const DEFAULT_REGISTRY_URL: &str = "https://api.nuget.org/v3/index.json";

/// Name of [`DEFAULT_REGISTRY_URL`] in generated configurations.
pub const DEFAULT_REGISTRY_NAME: &str = "nuget.org";

/// User-facing settings, loadable from `lockstep.toml`, `.json` or `.yaml`.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Extensions (without the dot) recognised as project manifests
    pub manifest_extensions: Vec<String>,

    /// Where temporary registry configurations are created
    pub cache_dir: Option<PathBuf>,

    /// Isolation image hint passed to the process runner
    pub image: Option<String>,

    /// Upper bound for the whole restore batch
    pub timeout_secs: Option<u64>,

    /// Registries used when no registry configuration file is found
    pub default_registries: Vec<Registry>,

    /// Credential rules consulted for each registry
    pub host_rules: Vec<HostRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_extensions: DEFAULT_MANIFEST_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            cache_dir: None,
            image: Some("dotnet".to_string()),
            timeout_secs: None,
            default_registries: vec![Registry::named(DEFAULT_REGISTRY_URL, DEFAULT_REGISTRY_NAME)],
            host_rules: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML, JSON or YAML file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Build the context for an update rooted at `root_dir`.
    pub fn context(&self, root_dir: NormalizedPath) -> UpdateContext {
        let root_dir = root_dir.clean();
        let cache_dir = match &self.cache_dir {
            Some(dir) => NormalizedPath::new(dir),
            None => dirs::cache_dir()
                .map(|dir| NormalizedPath::new(dir).join("lockstep"))
                .unwrap_or_else(|| root_dir.join(".lockstep-cache")),
        };

        UpdateContext {
            exec: ExecOptions {
                cwd: root_dir.clone(),
                image: self.image.clone(),
                timeout: self.timeout_secs.map(Duration::from_secs),
            },
            root_dir,
            cache_dir,
            manifest_extensions: self.manifest_extensions.clone(),
        }
    }
}

/// Everything an update needs to know about its surroundings.
///
/// Built once per invocation and passed explicitly to each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateContext {
    /// Root of the source tree; graph discovery starts here
    pub root_dir: NormalizedPath,

    /// Base directory for temporary registry configurations
    pub cache_dir: NormalizedPath,

    /// Extensions recognised as manifests
    pub manifest_extensions: Vec<String>,

    /// Options handed to the process runner
    pub exec: ExecOptions,
}

impl UpdateContext {
    /// Whether `path` names a manifest type this tool can regenerate locks for.
    pub fn is_supported_manifest(&self, path: &NormalizedPath) -> bool {
        path.extension().is_some_and(|ext| {
            self.manifest_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }

    /// Absolute, cleaned path of a manifest given relative to the root.
    pub fn manifest_path(&self, package_file_name: &str) -> NormalizedPath {
        let path = NormalizedPath::new(package_file_name);
        if path.is_absolute() {
            path.clean()
        } else {
            self.root_dir.join(path.as_str()).clean()
        }
    }

    /// `path` relative to the root, or unchanged if it lies outside it.
    pub fn display_path(&self, path: &NormalizedPath) -> String {
        path.strip_prefix(&self.root_dir)
            .unwrap_or_else(|| path.clone())
            .as_str()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> UpdateContext {
        Settings {
            cache_dir: Some(PathBuf::from("/tmp/cache")),
            ..Settings::default()
        }
        .context(NormalizedPath::new("/repo/"))
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.manifest_extensions, vec!["csproj", "vbproj", "fsproj"]);
        assert_eq!(settings.default_registries.len(), 1);
        assert_eq!(settings.default_registries[0].url, DEFAULT_REGISTRY_URL);
        assert_eq!(settings.image.as_deref(), Some("dotnet"));
    }

    #[test]
    fn test_context_uses_configured_cache_dir() {
        let ctx = context();
        assert_eq!(ctx.cache_dir.as_str(), "/tmp/cache");
        assert_eq!(ctx.root_dir.as_str(), "/repo");
        assert_eq!(ctx.exec.cwd.as_str(), "/repo");
        assert_eq!(ctx.exec.timeout, None);
    }

    #[test]
    fn test_timeout_is_converted() {
        let settings = Settings {
            timeout_secs: Some(90),
            ..Settings::default()
        };
        let ctx = settings.context(NormalizedPath::new("/repo"));
        assert_eq!(ctx.exec.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_supported_manifest_is_case_insensitive() {
        let ctx = context();
        assert!(ctx.is_supported_manifest(&NormalizedPath::new("/repo/A/A.csproj")));
        assert!(ctx.is_supported_manifest(&NormalizedPath::new("/repo/B/B.FSPROJ")));
        assert!(!ctx.is_supported_manifest(&NormalizedPath::new("/repo/readme.txt")));
        assert!(!ctx.is_supported_manifest(&NormalizedPath::new("/repo/Directory.Packages.props")));
        assert!(!ctx.is_supported_manifest(&NormalizedPath::new("/repo/csproj")));
    }

    #[test]
    fn test_manifest_path_relative_and_absolute() {
        let ctx = context();
        assert_eq!(ctx.manifest_path("src/App/App.csproj").as_str(), "/repo/src/App/App.csproj");
        assert_eq!(ctx.manifest_path("src\\App\\..\\Lib\\Lib.csproj").as_str(), "/repo/src/Lib/Lib.csproj");
        assert_eq!(ctx.manifest_path("/other/X.csproj").as_str(), "/other/X.csproj");
    }

    #[test]
    fn test_display_path() {
        let ctx = context();
        assert_eq!(ctx.display_path(&NormalizedPath::new("/repo/A/packages.lock.json")), "A/packages.lock.json");
        assert_eq!(ctx.display_path(&NormalizedPath::new("/elsewhere/x")), "/elsewhere/x");
    }
}
