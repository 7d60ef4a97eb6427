//! Graph command implementation

use std::path::Path;

use colored::Colorize;
use lockstep_core::ArtifactUpdater;
use serde_json::{Map, Value};

use super::{load_settings, resolve_root};
use crate::error::Result;

/// Run the graph command
///
/// Prints every discovered manifest with the manifests it references,
/// paths relative to the root.
pub fn run_graph(root: Option<&Path>, config: Option<&Path>, json: bool) -> Result<()> {
    let root = resolve_root(root)?;
    let settings = load_settings(&root, config)?;
    let ctx = settings.context(root);

    let graph = ArtifactUpdater::local(&settings).build_graph(&ctx, None)?;

    if json {
        let nodes: Map<String, Value> = graph
            .iter()
            .map(|(node, references)| {
                let references = references
                    .iter()
                    .map(|r| Value::String(ctx.display_path(r)))
                    .collect();
                (ctx.display_path(node), Value::Array(references))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&Value::Object(nodes))?);
        return Ok(());
    }

    if graph.is_empty() {
        println!("{} No manifests found under {}", "OK".green().bold(), ctx.root_dir.as_str().yellow());
        return Ok(());
    }

    println!(
        "{} {} ({} manifests, {} references)",
        "Graph".blue().bold(),
        ctx.root_dir.as_str().yellow(),
        graph.node_count(),
        graph.edge_count()
    );
    println!();
    for (node, references) in graph.iter() {
        println!("{}", ctx.display_path(node).bold());
        for reference in references {
            println!("  {} {}", "->".cyan(), ctx.display_path(reference));
        }
    }
    Ok(())
}
