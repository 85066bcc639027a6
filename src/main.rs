//! lexmerge - find and merge duplicate lexicon entries

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::context::CommandContext;
use cli::{FindOptions, MergeOptions};
use lexmerge::config::load_config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "LEXMERGE_LOG";

#[derive(Parser)]
#[command(name = "lexmerge", version, about = "Find and merge duplicate lexicon entries")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List likely duplicate groups
    Find {
        /// Words file (JSON array)
        words: PathBuf,

        /// Number of groups to list
        #[arg(long)]
        max_groups: Option<usize>,

        /// Edit distance for the fallback pass
        #[arg(long)]
        strictness: Option<f64>,

        /// Print groups as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review the next duplicate group and submit the result
    Merge {
        /// Words file (JSON array)
        words: PathBuf,

        /// JSON file of merge tree operations to apply
        #[arg(long)]
        ops: Option<PathBuf>,

        /// Edit distance for the fallback pass
        #[arg(long)]
        strictness: Option<f64>,

        /// Show the plan without submitting
        #[arg(long)]
        dry_run: bool,

        /// Preview the plan and ask before submitting
        #[arg(long, short = 'c')]
        confirm: bool,

        /// Put the group aside for later instead of merging
        #[arg(long, conflicts_with = "ops")]
        defer: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Find {
            words,
            max_groups,
            strictness,
            json,
        } => {
            let ctx = CommandContext::new(&words, config)?;
            cli::run_find(
                &ctx,
                FindOptions {
                    max_groups,
                    strictness,
                    json,
                },
            )
            .await?;
        }
        Commands::Merge {
            words,
            ops,
            strictness,
            dry_run,
            confirm,
            defer,
        } => {
            let ctx = CommandContext::new(&words, config)?;
            cli::run_merge(
                &ctx,
                MergeOptions {
                    ops,
                    strictness,
                    dry_run,
                    confirm,
                    defer,
                },
            )
            .await?;
        }
    }

    Ok(())
}
