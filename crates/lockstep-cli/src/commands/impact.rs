//! Impact command implementation
//!
//! Lists the manifests a change would restore, changed manifest first.

use std::path::Path;

use colored::Colorize;
use lockstep_core::ArtifactUpdater;
use serde_json::json;

use super::{load_settings, resolve_manifest, resolve_root};
use crate::error::Result;

/// Run the impact command
pub fn run_impact(manifest: &Path, root: Option<&Path>, config: Option<&Path>, json: bool) -> Result<()> {
    let root = resolve_root(root)?;
    let settings = load_settings(&root, config)?;
    let manifest = resolve_manifest(&root, manifest)?;
    let ctx = settings.context(root);

    let impact = ArtifactUpdater::local(&settings).resolve_impact(&ctx, manifest.as_str())?;
    let changed = ctx.display_path(impact.changed());
    let dependents: Vec<String> = impact.dependents().iter().map(|p| ctx.display_path(p)).collect();

    if json {
        let output = json!({
            "changed": changed,
            "dependents": dependents,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Changed".blue().bold(), changed.yellow());
    if dependents.is_empty() {
        println!("{}", "No dependent projects.".dimmed());
        return Ok(());
    }

    println!();
    println!("{} ({})", "Dependents".bold(), dependents.len());
    for dependent in &dependents {
        println!("  {} {}", "~".yellow(), dependent);
    }
    Ok(())
}
