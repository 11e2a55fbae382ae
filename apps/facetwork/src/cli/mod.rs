//! # Facetwork CLI Module
//!
//! This module implements the CLI interface for Facetwork.
//!
//! ## Available Commands
//!
//! - `inspect` - Show the specification of one type, or of every domain type
//! - `validate` - Prime the metamodel and report validation failures
//! - `export` - Write a metamodel snapshot (JSON or binary)
//! - `decode` - Read back a snapshot file and summarize it

mod commands;

use clap::{Parser, Subcommand};
use facetwork_core::MetamodelError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Facetwork - metamodel inspector
///
/// Builds the facet-based metamodel of the bundled demo domain and reports
/// on it.
#[derive(Parser, Debug)]
#[command(name = "facetwork")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML metamodel configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show object specifications
    Inspect {
        /// Type to inspect (all domain types when omitted)
        #[arg(short = 't', long)]
        type_name: Option<String>,
    },

    /// Prime the metamodel and run the validation pass
    Validate {
        /// Fail on any validation finding
        #[arg(short, long)]
        strict: bool,
    },

    /// Export a metamodel snapshot
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (json, binary)
        #[arg(short = 'f', long, default_value = "json")]
        format: String,

        /// Include built-in value and collection types
        #[arg(long)]
        builtins: bool,
    },

    /// Summarize a previously exported snapshot
    Decode {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), MetamodelError> {
    let json_mode = cli.json_mode;
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Inspect { type_name }) => {
            cmd_inspect(config, json_mode, type_name.as_deref())
        }
        Some(Commands::Validate { strict }) => cmd_validate(config, json_mode, strict),
        Some(Commands::Export {
            output,
            format,
            builtins,
        }) => cmd_export(config, &output, &format, builtins),
        Some(Commands::Decode { input }) => cmd_decode(&input, json_mode),
        None => {
            // No subcommand - inspect everything by default
            cmd_inspect(config, json_mode, None)
        }
    }
}
