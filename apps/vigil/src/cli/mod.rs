//! # Vigil CLI Module
//!
//! ## Available Commands
//!
//! - `check` - Run a check and print the plugin output
//! - `validate` - Assemble a check definition without running it
//! - `range` - Test a value against a threshold range

mod commands;

use crate::error::CliError;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Vigil - monitoring plugin runner
///
/// Evaluates a check definition and reports in the Nagios plugin format:
/// one status line, optional verbose lines and exit code 0-3.
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase output verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a check
    Check {
        /// Path to the check definition (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Abort after this many seconds (overrides the definition)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assemble a check definition without evaluating it
    Validate {
        /// Path to the check definition (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Test whether a value lies inside a threshold range
    Range {
        /// Range, e.g. `10`, `5:`, `~:10`, `@10:20`
        #[arg(allow_hyphen_values = true)]
        spec: String,

        /// Value to test
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and return the process exit code.
pub async fn execute(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Commands::Check {
            config,
            timeout,
            json,
        } => cmd_check(&config, timeout, cli.verbose, json).await,
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Range { spec, value } => cmd_range(&spec, value),
    }
}
