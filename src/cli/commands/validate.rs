//! Validate command implementation
//!
//! This module implements the `validate` command for checking saved IPS
//! bundle files.

use crate::core::validate_file;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Bundle files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    ///
    /// Returns `0` when every file is valid, `1` otherwise.
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(files = self.files.len(), "Validating bundle files");

        let reports: Vec<_> = self.files.iter().map(validate_file).collect();
        for report in &reports {
            report.log_summary();
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            for report in &reports {
                println!("{}", report.format_summary());
            }
        }

        let valid = reports.iter().filter(|r| r.is_valid()).count();
        let invalid = reports.len() - valid;
        if !self.json && reports.len() > 1 {
            println!(
                "Summary: {valid} valid, {invalid} invalid out of {} total",
                reports.len()
            );
        }

        Ok(if invalid == 0 { 0 } else { 1 })
    }
}
