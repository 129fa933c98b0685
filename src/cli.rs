//! Command-line interface module for sortdl.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading
//! - Organization orchestration and reporting

use crate::audit::AuditLog;
use crate::config::{ConfigError, Settings};
use crate::file_organizer::{OrganizeError, OrganizeReport, Organizer, RunMode};
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Organize a downloads folder by file type.
#[derive(Debug, Clone, Parser)]
#[command(name = "sortdl", version, about)]
pub struct Args {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Simulate actions without moving files
    #[arg(long)]
    pub dry_run: bool,

    /// Where to append the record of completed moves
    #[arg(long, default_value = "organizer.log")]
    pub log_file: PathBuf,
}

impl Args {
    pub fn mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Live
        }
    }
}

/// Errors that stop a run before or during the pass.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

/// Runs one organize pass as described by the command-line arguments.
///
/// Loads the settings, then moves (or simulates moving) every classified file
/// and prints a summary. Per-file failures do not stop the pass; they are in
/// the returned report.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use sortdl::cli::{run_cli, Args};
///
/// let args = Args::parse_from(["sortdl", "--dry-run"]);
/// match run_cli(&args) {
///     Ok(report) => println!("{} files", report.operations().len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &Args) -> Result<OrganizeReport, RunError> {
    let settings = Settings::load(&args.config)?;
    let audit = AuditLog::new(&args.log_file);
    let mode = args.mode();

    match mode {
        RunMode::DryRun => OutputFormatter::info(&format!(
            "DRY RUN: Analyzing contents of: {}",
            settings.source_dir.display()
        )),
        RunMode::Live => OutputFormatter::info(&format!(
            "Organizing contents of: {}",
            settings.source_dir.display()
        )),
    }

    let report = Organizer::new(&settings, &audit).run(mode)?;
    print_report(&report, mode);
    Ok(report)
}

fn print_report(report: &OrganizeReport, mode: RunMode) {
    let operations = report.operations();
    if operations.is_empty() && report.failures.is_empty() {
        OutputFormatter::info("No files found to organize.");
        return;
    }

    OutputFormatter::summary_table(&report.category_counts(), operations.len());

    if !report.unclassified.is_empty() {
        OutputFormatter::info(&format!(
            "Left in place (unknown type): {}",
            report.unclassified.len()
        ));
    }
    for (path, category) in &report.no_destination {
        OutputFormatter::warning(&format!(
            "No destination folder for category '{}': {}",
            category,
            path.display()
        ));
    }

    if !report.failures.is_empty() {
        OutputFormatter::error(&format!(
            "{} file(s) could not be organized. Please review errors above.",
            report.failures.len()
        ));
        return;
    }

    match mode {
        RunMode::DryRun => {
            OutputFormatter::success("Dry run complete. No files were modified.");
            OutputFormatter::plain("Run again without --dry-run to move the files.");
        }
        RunMode::Live => OutputFormatter::success("Organization complete!"),
    }
}
