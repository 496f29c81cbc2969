//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Contract Trace Visualizer CLI
#[derive(Parser, Debug)]
#[command(name = "contract-trace-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconstruct intervals, transfers and state graphs from a trace
    Analyze {
        /// Path to the trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Trace source type
        #[arg(short, long, value_enum, default_value = "file")]
        source: TraceSourceType,

        /// Correlation feed path (overrides the derived location)
        #[arg(long)]
        feed: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Validate a correlation feed file
    FeedValidate {
        /// Path to the feed file
        feed: PathBuf,
    },
}

/// Trace source types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceSourceType {
    /// Chrome-trace-format JSON file
    File,
    /// Mock data for testing
    Mock,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// DOT format (Graphviz)
    Dot,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub async fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Analyze { .. } => commands::analyze::execute(args, config).await,
        Commands::FeedValidate { feed } => commands::feed_validate::execute(&feed),
    }
}
