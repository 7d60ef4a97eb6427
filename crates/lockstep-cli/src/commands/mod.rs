//! Command implementations for lockstep-cli

pub mod graph;
pub mod impact;
pub mod update;

use std::path::Path;

use lockstep_core::Settings;
use lockstep_fs::NormalizedPath;
use tracing::debug;

use crate::error::{CliError, Result};

pub use graph::run_graph;
pub use impact::run_impact;
pub use update::{UpdateArgs, run_update};

/// Settings files picked up from the root when `--config` is not given.
const SETTINGS_FILES: &[&str] = &["lockstep.toml", "lockstep.json", "lockstep.yaml", "lockstep.yml"];

/// Canonical root directory: `root` if given, else the current directory.
pub fn resolve_root(root: Option<&Path>) -> Result<NormalizedPath> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::user(format!("Not a directory: {}", root.display())));
    }
    Ok(NormalizedPath::canonicalize(&root)?)
}

/// Absolute path of a manifest named on the command line.
///
/// Relative names are taken from `root`. Existing manifests are
/// canonicalized so they compare equal to the paths discovered under the
/// root.
pub fn resolve_manifest(root: &NormalizedPath, manifest: &Path) -> Result<NormalizedPath> {
    let manifest = if manifest.is_absolute() {
        manifest.to_path_buf()
    } else {
        root.to_native().join(manifest)
    };
    match NormalizedPath::canonicalize(&manifest) {
        Ok(path) => Ok(path),
        Err(_) => Ok(NormalizedPath::new(manifest).clean()),
    }
}

/// Settings from `config`, from a settings file in `root`, or the defaults.
pub fn load_settings(root: &NormalizedPath, config: Option<&Path>) -> Result<Settings> {
    if let Some(config) = config {
        return Ok(Settings::load(&NormalizedPath::new(config))?);
    }

    for name in SETTINGS_FILES {
        let candidate = root.join(name);
        if candidate.is_file() {
            debug!(config = %candidate, "Loading settings");
            return Ok(Settings::load(&candidate)?);
        }
    }
    Ok(Settings::default())
}
