//! cmdb CLI - Impact analysis and graph layout for CMDB snapshots.
//!
//! Reads a snapshot directory of JSONL records, builds the dependency graph
//! and answers impact, layout, cycle and statistics queries.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Context;

/// cmdb: Dependency graph and impact analysis for CMDB snapshots.
#[derive(Parser)]
#[command(name = "cmdb")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Snapshot directory with services/cis/mappings/relationships JSONL files
    #[arg(short, long, global = true, default_value = ".")]
    snapshot: PathBuf,

    /// Engine config file (defaults to cmdb.yaml in the snapshot directory, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show everything affected by the failure of a node
    Impact {
        /// Node id, e.g. "ci-12" or "service-3"
        node: String,
    },

    /// Compute a layered layout of the filtered graph
    Layout {
        /// Flag nodes impacted by the failure of this node
        #[arg(long)]
        source: Option<String>,

        /// Override the configured direction (tb, bt, lr, rl)
        #[arg(short, long)]
        direction: Option<String>,
    },

    /// Report CIs that depend on each other in a cycle
    Cycles,

    /// Show snapshot and graph statistics
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "cmdb=warn,cmdb_graph=warn",
        1 => "cmdb=info,cmdb_graph=info",
        2 => "cmdb=debug,cmdb_graph=debug",
        _ => "cmdb=trace,cmdb_graph=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match Context::load(&cli.snapshot, cli.config.as_deref(), cli.json).await {
        Ok(ctx) => match cli.command {
            Commands::Impact { node } => cli::impact::run(&ctx, &node),
            Commands::Layout { source, direction } => {
                cli::layout::run(&ctx, source.as_deref(), direction.as_deref())
            }
            Commands::Cycles => cli::cycles::run(&ctx),
            Commands::Stats => cli::stats::run(&ctx),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
