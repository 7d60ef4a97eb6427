//! Update command implementation
//!
//! Regenerates the lock files affected by a manifest change and prints the
//! ones that changed.

use std::path::{Path, PathBuf};

use colored::Colorize;
use lockstep_core::{
    ArtifactUpdater, UpdateArtifact, UpdateArtifactsConfig, UpdateArtifactsResult, UpdatedDependency,
};
use serde_json::json;

use super::{load_settings, resolve_manifest, resolve_root};
use crate::error::{CliError, Result};

/// Arguments of `lockstep update`.
#[derive(Debug, Clone)]
pub struct UpdateArgs {
    pub manifest: PathBuf,
    pub root: Option<PathBuf>,
    pub content: Option<PathBuf>,
    pub deps: Vec<String>,
    pub maintenance: bool,
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// Run the update command
///
/// Fails after printing the report when the restore produced an artifact
/// error.
pub fn run_update(args: UpdateArgs) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;
    let settings = load_settings(&root, args.config.as_deref())?;
    let manifest = resolve_manifest(&root, &args.manifest)?;
    let ctx = settings.context(root);

    let new_content = read_new_content(&manifest.to_native(), args.content.as_deref())?;
    let request = UpdateArtifact {
        package_file_name: manifest.as_str().to_string(),
        new_package_file_content: new_content,
        config: UpdateArtifactsConfig {
            is_lock_file_maintenance: args.maintenance,
        },
        updated_deps: args.deps.iter().map(UpdatedDependency::new).collect(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let updater = ArtifactUpdater::local(&settings);
    let results = runtime.block_on(updater.update_artifacts(&ctx, &request))?;

    if args.json {
        let output = json!({
            "manifest": ctx.display_path(&manifest),
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_results(results.as_deref());
    }

    let failed = results
        .iter()
        .flatten()
        .any(UpdateArtifactsResult::is_error);
    if failed {
        return Err(CliError::user("Lock file update failed"));
    }
    Ok(())
}

/// New manifest content: the `--content` file, else the manifest on disk.
fn read_new_content(manifest: &Path, content: Option<&Path>) -> Result<String> {
    let source = content.unwrap_or(manifest);
    std::fs::read_to_string(source)
        .map_err(|e| CliError::user(format!("Failed to read {}: {e}", source.display())))
}

fn print_results(results: Option<&[UpdateArtifactsResult]>) {
    let Some(results) = results else {
        println!("{} No lock files changed.", "OK".green().bold());
        return;
    };

    for result in results {
        match result {
            UpdateArtifactsResult::File { path, contents, stats } => {
                let marker = if contents.is_some() { "~".yellow() } else { "-".red() };
                println!(
                    "{} {} ({}, {})",
                    marker,
                    path,
                    format!("+{}", stats.insertions).green(),
                    format!("-{}", stats.deletions).red()
                );
            }
            UpdateArtifactsResult::ArtifactError { lock_files, stderr } => {
                println!("{} Restore failed for:", "ERROR".red().bold());
                for lock_file in lock_files {
                    println!("  {lock_file}");
                }
                println!();
                for line in stderr.lines() {
                    println!("  {}", line.dimmed());
                }
            }
        }
    }
}
