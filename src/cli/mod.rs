//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for IPSGen using clap.
//!
//! Exit codes: `0` success, `1` a validated bundle is invalid, `2`
//! configuration error, `5` any other fatal error.

pub mod commands;

use crate::domain::IpsError;
use clap::{Parser, Subcommand};

/// Exit code for a configuration error
pub const EXIT_CONFIGURATION: i32 = 2;
/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Maps an error to the process exit code
pub fn exit_code(error: &IpsError) -> i32 {
    if error.is_configuration() {
        EXIT_CONFIGURATION
    } else {
        EXIT_FATAL
    }
}

/// IPSGen - synthetic International Patient Summary generator
#[derive(Parser, Debug)]
#[command(name = "ipsgen")]
#[command(version, about, long_about = None)]
#[command(author = "IPSGen Contributors")]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when absent)
    #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_FILE, env = "IPSGEN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "IPSGEN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate IPS bundles
    Generate(commands::generate::GenerateArgs),

    /// Validate saved IPS bundle files
    Validate(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
