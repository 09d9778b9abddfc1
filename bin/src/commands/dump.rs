//! Dump command implementation.
//!
//! Decodes a QCB file with the chunked reader and exports the ticks.

use crate::display::{Format, reader_config, tick_spinner, write_ticks};
use anyhow::{Context, Result};
use qcb_lib::prelude::*;
use std::path::Path;

/// Decode `path` and write its ticks in `format`.
pub(crate) fn dump(
    path: &Path,
    format: Format,
    output: Option<&Path>,
    chunk_size: usize,
    limit: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let reader = ChunkedTickReader::open(path, reader_config(chunk_size)?)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    // Progress goes to stderr, but keep it off when the data itself is on stdout.
    let progress = tick_spinner(quiet || output.is_none(), "decoding")?;
    let mut ticks = Vec::new();
    for tick in reader.take(limit.unwrap_or(usize::MAX)) {
        let tick = tick.with_context(|| format!("Decode failed after {} ticks", ticks.len()))?;
        ticks.push(tick);
        progress.inc(1);
    }
    progress.finish_with_message(format!("Decoded {} ticks", ticks.len()));

    write_ticks(&ticks, output, format)?;
    tracing::info!(ticks = ticks.len(), %format, "Export complete");

    if let (Some(output), false) = (output, quiet) {
        println!("Output written to: {}", output.display());
    }

    Ok(())
}
