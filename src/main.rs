//! gmotor CLI - list and unpack gMotor MAS containers.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gmotor::prelude::*;

/// Unpack gMotor MAS containers
#[derive(Parser)]
#[command(name = "gmotor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// MAS file to read
    #[arg(value_name = "MASFILE", env = "MAS_FILE")]
    mas_file: PathBuf,

    /// Directory to extract into; must not exist yet
    #[arg(value_name = "OUTDIR", env = "OUTPUT_FOLDER")]
    output: Option<PathBuf>,

    /// List only, don't extract
    #[arg(short, long)]
    list: bool,

    /// Prefix listed names with the container path
    #[arg(short = 'H', long)]
    with_filename: bool,

    /// Verbose listing and debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.output.as_deref() {
        Some(output) if !cli.list => cmd_extract(&cli.mas_file, output),
        _ => cmd_list(&cli.mas_file, cli.verbose, cli.with_filename),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open(mas_file: &Path) -> Result<MasArchive> {
    let start = Instant::now();
    let archive = MasArchive::open(mas_file)
        .with_context(|| format!("Failed to open MAS container {}", mas_file.display()))?;

    debug!(
        variant = %archive.container().variant(),
        entries = archive.entry_count(),
        elapsed = ?start.elapsed(),
        "loaded file table"
    );
    Ok(archive)
}

fn cmd_list(mas_file: &Path, verbose: bool, with_filename: bool) -> Result<()> {
    let archive = open(mas_file)?;

    let prefix = mas_file.display().to_string();
    let style = if verbose {
        ListStyle::Verbose
    } else if with_filename {
        ListStyle::PrefixedNames(&prefix)
    } else {
        ListStyle::Names
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    archive
        .container()
        .write_listing(&mut out, style)
        .context("Failed to write listing")?;
    out.flush()?;

    Ok(())
}

fn cmd_extract(mas_file: &Path, output: &Path) -> Result<()> {
    let mut archive = open(mas_file)?;

    let pb = ProgressBar::new(archive.entry_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let report = archive
        .extract_to_with(output, |entry, path| {
            pb.suspend(|| {
                println!(
                    "{:8} {:8} {:8} {}",
                    entry.offset(),
                    entry.size(),
                    entry.zsize(),
                    path.display()
                )
            });
            pb.inc(1);
        })
        .with_context(|| {
            format!("Failed to extract {} into {}", mas_file.display(), output.display())
        });

    match report {
        Ok(report) => {
            pb.finish_and_clear();
            eprintln!(
                "Extracted {} files ({} bytes) in {:?}",
                report.files_written,
                report.bytes_written,
                start.elapsed()
            );
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            Err(e)
        }
    }
}
