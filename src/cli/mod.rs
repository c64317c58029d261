//! # CLI Module
//!
//! Command-line interface for the photo organizer.
//!
//! ## Usage
//! ```bash
//! # Organize a source tree into an output tree
//! photo-organize organize ~/Unsorted ~/Photos
//!
//! # Keep the index somewhere specific
//! photo-organize organize ~/Unsorted ~/Photos --index ~/photos-index.db
//!
//! # JSON summary for scripting
//! photo-organize organize ~/Unsorted ~/Photos --format json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_organizer::core::index::SqliteIndex;
use photo_organizer::core::pipeline::{FileOutcome, OrganizeReport, Organizer};
use photo_organizer::error::Result;
use std::path::PathBuf;

/// Photo Organizer - file media by capture year, dedupe by content
#[derive(Parser, Debug)]
#[command(name = "photo-organize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Move every file under SOURCE into an organized tree under OUTPUT
    Organize {
        /// Directory to organize
        source: PathBuf,

        /// Destination root for the organized tree
        output: PathBuf,

        /// Index database path (remembers what has been filed across runs)
        #[arg(long)]
        index: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,

        /// Print one line per file as it is processed
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON summary for scripting
    Json,
    /// Minimal output (summary line only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Organize {
            source,
            output,
            index,
            format,
            verbose,
        } => run_organize(source, output, index, format, verbose),
    }
}

fn run_organize(
    source: PathBuf,
    output: PathBuf,
    index_path: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(format, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Photo Organizer").bold().cyan(),
            style(env!("CARGO_PKG_VERSION")).dim()
        ))
        .ok();
        term.write_line(&format!("  Source: {}", source.display())).ok();
        term.write_line(&format!("  Output: {}", output.display())).ok();
        term.write_line("").ok();
    }

    // The index lives next to the organized tree unless told otherwise
    let index_path = index_path.unwrap_or_else(|| output.join(".photo-index.db"));
    let index = SqliteIndex::open(&index_path)?;

    let organizer = Organizer::builder(source, output).index(Box::new(index)).build();

    let progress = if matches!(format, OutputFormat::Pretty) && !verbose {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {pos} files processed {msg}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    let report = organizer.run_with_observer(|outcome| {
        if let Some(ref pb) = progress {
            pb.inc(1);
        }
        if verbose {
            print_outcome_line(&term, outcome);
        }
    })?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match format {
        OutputFormat::Pretty => print_pretty_report(&term, &report),
        OutputFormat::Json => print_json_report(&report),
        OutputFormat::Minimal => print_minimal_report(&report),
    }

    // Per-file errors are reported above but never change the exit status
    Ok(())
}

fn print_outcome_line(term: &Term, outcome: &FileOutcome) {
    let line = match outcome {
        FileOutcome::Filed { source, dest, year } => format!(
            "{} {} -> {}",
            style("filed").green(),
            source.display(),
            match year {
                Some(y) => format!("{:04}/", y),
                None => format!(
                    "{}/",
                    dest.parent()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ),
            }
        ),
        FileOutcome::Duplicate { source, .. } => {
            format!("{} {}", style("duplicate").yellow(), source.display())
        }
        FileOutcome::Unsupported { source, .. } => {
            format!("{} {}", style("unsupported").dim(), source.display())
        }
        FileOutcome::Error { source, message } => format!(
            "{} {}: {}",
            style("error").red().bold(),
            source.display(),
            message
        ),
    };
    term.write_line(&line).ok();
}

fn print_pretty_report(term: &Term, report: &OrganizeReport) {
    term.write_line("").ok();
    term.write_line(&format!("{} Organize Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files processed in {:.1}s",
        style(report.total_files).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!("  {} filed", style(report.filed).cyan())).ok();
    term.write_line(&format!(
        "  {} duplicates",
        style(report.duplicates).yellow()
    ))
    .ok();
    term.write_line(&format!(
        "  {} unsupported",
        style(report.unsupported).dim()
    ))
    .ok();

    if !report.errors.is_empty() {
        term.write_line(&format!(
            "  {} errors",
            style(report.errors.len()).red().bold()
        ))
        .ok();
        term.write_line("").ok();
        for error in &report.errors {
            term.write_line(&format!("    {} {}", style("!").red(), error)).ok();
        }
    }
}

fn print_json_report(report: &OrganizeReport) {
    let output = serde_json::json!({
        "total_files": report.total_files,
        "filed": report.filed,
        "duplicates": report.duplicates,
        "unsupported": report.unsupported,
        "errors": report.errors,
        "duration_ms": report.duration_ms,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn print_minimal_report(report: &OrganizeReport) {
    println!(
        "{} filed, {} duplicates, {} unsupported, {} errors",
        report.filed,
        report.duplicates,
        report.unsupported,
        report.errors.len()
    );
}
