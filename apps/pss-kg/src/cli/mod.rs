//! # PSS-KG CLI Module
//!
//! This module implements the CLI interface for pss-kg.
//!
//! ## Available Commands
//!
//! - `run` - Transform exported records into knowledge-graph nodes and edges
//! - `rules` - Show the edge-generation rules of every reaction category

mod commands;

use crate::config::{Config, InputsConfig};
use clap::{Parser, Subcommand};
use pss_core::PssError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// PSS-KG - Plant Stress Signalling knowledge-graph builder
///
/// Turns labeled reaction records into typed nodes and directed edges.
#[derive(Parser, Debug)]
#[command(name = "pss-kg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress the human-readable summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./pss-kg.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the node and edge passes and write nodes.jsonl / edges.jsonl
    Run {
        /// JSON Lines file of node records
        #[arg(short, long)]
        nodes: Option<PathBuf>,

        /// JSON Lines file of reaction patterns
        #[arg(short, long)]
        reactions: Option<PathBuf>,

        /// JSON Lines file of foreign gene links
        #[arg(short, long)]
        foreign_links: Option<PathBuf>,

        /// Gene annotation TSV (may be .gz)
        #[arg(short, long)]
        annotations: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show every reaction category and its edge rules
    Rules,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), PssError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Run {
            nodes,
            reactions,
            foreign_links,
            annotations,
            output,
        } => {
            let overrides = InputsConfig {
                nodes,
                reactions,
                foreign_links,
                annotations,
            };
            let plan = Config::discover(cli.config.as_deref())?
                .with_overrides(overrides, output)
                .into_plan()?;
            cmd_run(&plan, json_mode, cli.quiet, cli.verbose)
        }
        Commands::Rules => cmd_rules(json_mode),
    }
}
