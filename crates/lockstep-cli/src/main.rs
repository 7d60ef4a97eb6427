//! lockstep CLI
//!
//! Regenerates the lock files of every project affected by a manifest change.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr so that `--json` output on stdout stays parseable.
///
/// `RUST_LOG` wins over the default level; `--verbose` raises the default
/// to debug.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact();

    // A subscriber may already be installed when embedded; keep going without ours
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Update {
            manifest,
            root,
            content,
            dep,
            maintenance,
            config,
            json,
        } => commands::run_update(commands::UpdateArgs {
            manifest,
            root,
            content,
            deps: dep,
            maintenance,
            config,
            json,
        }),
        Commands::Impact {
            manifest,
            root,
            config,
            json,
        } => commands::run_impact(&manifest, root.as_deref(), config.as_deref(), json),
        Commands::Graph { root, config, json } => {
            commands::run_graph(root.as_deref(), config.as_deref(), json)
        }
    }
}
