//! Sift CLI binary.
//!
//! Runs the filing pipeline over a directory of EDGAR archives or a single
//! archive and prints a run report.

mod integration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use integration::progress::BarObserver;
use sift::{SiftConfig, SiftError, default_processor};
use sift_filings::{CikFilter, IssuerFilter};
use sift_output::{ExportError, ExportFormat, Exporter, ReportError, RunReportBuilder, errors_path};
use sift_pipeline::{DirectoryStats, PipelineError};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Sift: batch MD&A extraction from EDGAR filing archives", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every archive in a directory
    Directory {
        /// Directory holding zip archives
        dir: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Process a single archive
    Archive {
        /// Zip archive of filings
        archive: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Keep only filings from this CIK (repeatable)
    #[arg(long = "cik")]
    ciks: Vec<String>,

    /// File listing CIKs to keep
    #[arg(long)]
    cik_file: Option<PathBuf>,

    /// Keep only this form type (repeatable, needs a CIK filter)
    #[arg(long = "form")]
    forms: Vec<String>,

    /// First fiscal year to keep
    #[arg(long)]
    year_from: Option<i32>,

    /// Last fiscal year to keep
    #[arg(long)]
    year_to: Option<i32>,

    /// Directory for extracted MD&A sections
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Export statistics to a .csv or .json file
    #[arg(long)]
    export: Option<PathBuf>,
}

impl RunArgs {
    /// Command-line values override the configuration file.
    fn apply(&self, config: &mut SiftConfig) {
        let filter = &mut config.filter;
        filter.ciks.extend(self.ciks.iter().cloned());
        if self.cik_file.is_some() {
            filter.cik_file.clone_from(&self.cik_file);
        }
        if !self.forms.is_empty() {
            filter.forms.clone_from(&self.forms);
        }
        filter.year_from = self.year_from.or(filter.year_from);
        filter.year_to = self.year_to.or(filter.year_to);

        if self.output.is_some() {
            config.extractor.output_dir.clone_from(&self.output);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Sift(#[from] SiftError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    integration::logging::init(cli.verbose);

    let mut config = integration::config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Directory { dir, run } => {
            run.apply(&mut config);
            process_directory(&dir, &config, &run)
        }
        Commands::Archive { archive, run } => {
            run.apply(&mut config);
            process_archive(&archive, &config, &run)
        }
    }
}

fn process_directory(dir: &Path, config: &SiftConfig, run: &RunArgs) -> Result<(), CliError> {
    if !dir.is_dir() {
        return Err(CliError::NotADirectory(dir.to_path_buf()));
    }

    let filter = config.filter.build()?;
    let mut processor = default_processor(config);
    let progress = BarObserver::new();
    let stats =
        processor.process_directory_with_progress(dir, as_filter(filter.as_ref()), Some(&progress));
    progress.finish();

    finish_run(stats?, dir, run)
}

fn process_archive(archive: &Path, config: &SiftConfig, run: &RunArgs) -> Result<(), CliError> {
    let filter = config.filter.build()?;
    let mut processor = default_processor(config);
    let stats = processor
        .archive_processor()
        .process_zip_file(archive, as_filter(filter.as_ref()));

    let directory = archive.display().to_string();
    finish_run(DirectoryStats::from_archive_results(directory, [stats]), archive, run)
}

fn as_filter(filter: Option<&CikFilter>) -> Option<&dyn IssuerFilter> {
    filter.map(|f| f as &dyn IssuerFilter)
}

fn finish_run(stats: DirectoryStats, input: &Path, run: &RunArgs) -> Result<(), CliError> {
    if let Some(path) = &run.export {
        let format = ExportFormat::from_path(path)?;
        stats.export_to_file(path, format)?;
        tracing::info!(path = %path.display(), "exported statistics");
        if format == ExportFormat::Csv {
            tracing::info!(path = %errors_path(path).display(), "exported error records");
        }
    }

    let report = RunReportBuilder::new()
        .input(input.display().to_string())
        .directory(stats)
        .build()?;

    match run.format {
        ReportFormat::Text => print!("{}", report.to_ascii_table()),
        ReportFormat::Markdown => print!("{}", report.to_markdown()),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
