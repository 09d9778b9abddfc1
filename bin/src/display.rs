//! Display utilities and output formatting for the qcb CLI.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use qcb_lib::prelude::*;
use std::fs::File;
use std::io::{BufWriter, IsTerminal};
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

/// Output format for decoded ticks.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Parquet => Self::Parquet,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ExportFormat::from(*self))
    }
}

/// Write ticks to a file, or to stdout when no path is given.
pub(crate) fn write_ticks(ticks: &[Tick], output: Option<&Path>, format: Format) -> Result<()> {
    let format = ExportFormat::from(format);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            format.write_ticks(ticks, BufWriter::new(file))?;
        }
        None => {
            if format == ExportFormat::Parquet && std::io::stdout().is_terminal() {
                bail!("Refusing to write Parquet to a terminal; pass --output");
            }
            format.write_ticks(ticks, BufWriter::new(std::io::stdout()))?;
        }
    }
    Ok(())
}

/// Build a reader configuration from a command-line chunk size.
pub(crate) fn reader_config(chunk_size: usize) -> Result<ReaderConfig> {
    let chunk_size = NonZeroUsize::new(chunk_size).context("Chunk size must be at least 1")?;
    Ok(ReaderConfig::default().with_chunk_size(chunk_size))
}

/// Spinner that counts ticks, hidden in quiet mode.
pub(crate) fn tick_spinner(quiet: bool, message: &str) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} ticks ({per_sec}) {msg}")?,
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Format a byte count with a binary unit suffix.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
