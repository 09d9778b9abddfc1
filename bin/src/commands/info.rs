//! Info command implementation.
//!
//! Prints the stream header of a QCB file and, after a full decode pass, its
//! tick count and time span.

use crate::display::{format_bytes, tick_spinner};
use anyhow::{Context, Result};
use qcb_lib::prelude::*;
use std::path::Path;

/// Show the header, size and tick statistics of a QCB file.
pub(crate) fn show_info(path: &Path, quiet: bool) -> Result<()> {
    let file_size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    let mut reader = ChunkedTickReader::open(path, ReaderConfig::default())
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let header = *reader.header();

    println!("File:        {}", path.display());
    println!("Size:        {}", format_bytes(file_size));
    println!("Version:     {}", header.version);
    println!("Flags:       {:#010x}", header.flags);
    println!("Tick size:   {}", header.tick_size);
    println!("Time slice:  {} (100ns units)", header.time_slice_ticks);

    let progress = tick_spinner(quiet, "scanning")?;
    let mut first: Option<Tick> = None;
    let mut last: Option<Tick> = None;
    while let Some(tick) = reader
        .next_tick()
        .with_context(|| format!("Decode failed after {} ticks", reader.ticks_read()))?
    {
        if first.is_none() {
            first = Some(tick);
        }
        last = Some(tick);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let ticks = reader.ticks_read();
    println!("Ticks:       {ticks}");
    if let (Some(first), Some(last)) = (first, last) {
        println!("First:       {}", first.timestamp);
        println!("Last:        {}", last.timestamp);
        let body = file_size.saturating_sub(Header::SIZE as u64);
        println!("Bytes/tick:  {:.2}", body as f64 / ticks as f64);
    }

    Ok(())
}
