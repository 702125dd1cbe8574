//! searchdex - toolkit for generated documentation search indexes
//!
//! Builds, inspects, queries and validates the `searchData` tables a
//! documentation generator ships next to its HTML pages.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;
mod core;
mod index;

/// searchdex - documentation search index toolkit
#[derive(Parser)]
#[command(name = "searchdex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build, query and validate documentation search indexes", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate index files from a symbol manifest
    Build {
        /// Symbol manifest (JSON array of records)
        manifest: PathBuf,

        /// Output directory for the index files
        #[arg(short, long, default_value = "search")]
        output: PathBuf,

        /// Emit one all_<hex>.js per first character
        #[arg(long)]
        split: bool,

        /// Variable name the files assign to
        #[arg(long)]
        var_name: Option<String>,

        /// Prefix for page references
        #[arg(long)]
        page_prefix: Option<String>,
    },

    /// Query an index
    Search {
        /// Search query
        query: String,

        /// Index file or directory
        #[arg(short, long, default_value = "search")]
        index: PathBuf,

        /// Match mode (prefix, substring, fuzzy)
        #[arg(short, long)]
        mode: Option<String>,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Check an index for structural violations
    Validate {
        /// Index file or directory
        index: PathBuf,

        /// Require anchors everywhere and unique tokens
        #[arg(long)]
        strict: bool,

        /// Also check referenced pages exist under this directory
        #[arg(long)]
        docs_root: Option<PathBuf>,
    },

    /// Dump index entries
    List {
        /// Index file or directory
        index: PathBuf,

        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Show version, environment and index statistics
    Info {
        /// Index file or directory to summarize
        index: Option<PathBuf>,
    },

    /// Show or initialize configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    debug!("searchdex v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Build {
            manifest,
            output,
            split,
            var_name,
            page_prefix,
        } => {
            cli::build::run(
                config,
                cli::build::BuildArgs {
                    manifest: &manifest,
                    output: &output,
                    split: split.then_some(true),
                    var_name: var_name.as_deref(),
                    page_prefix: page_prefix.as_deref(),
                },
            )
            .await?;
        }
        Commands::Search {
            query,
            index,
            mode,
            limit,
        } => {
            cli::search::run(config, &index, &query, mode.as_deref(), limit).await?;
        }
        Commands::Validate {
            index,
            strict,
            docs_root,
        } => {
            cli::validate::run(config, &index, strict, docs_root.as_deref()).await?;
        }
        Commands::List { index, json } => {
            cli::list::run(&index, json).await?;
        }
        Commands::Info { index } => {
            cli::info::run(index.as_deref())?;
        }
        Commands::Config { show, init } => {
            if init {
                config::init_config()?;
            } else if show {
                config::show_config(&config)?;
            }
        }
    }

    Ok(())
}
