//! Encode command implementation.
//!
//! Reads `timestamp,bid,ask` rows from a CSV file and writes them as a QCB
//! stream.

use crate::display::{format_bytes, tick_spinner};
use anyhow::{Context, Result};
use qcb_lib::prelude::*;
use serde::{Deserialize, Deserializer};
use std::io::{Read, Write};
use std::path::Path;

/// One input row. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct Row {
    timestamp: i64,
    #[serde(deserialize_with = "exact_decimal")]
    bid: Decimal,
    #[serde(deserialize_with = "exact_decimal")]
    ask: Decimal,
}

/// Parses the field text directly so no price passes through `f64`.
fn exact_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Decimal, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
}

/// Encode the CSV at `input` into a QCB file at `output`.
pub(crate) fn encode(input: &Path, output: &Path, header: Header, quiet: bool) -> Result<()> {
    let source = std::fs::File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let writer = QcbWriter::create(output, header)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let progress = tick_spinner(quiet, "encoding")?;
    let (ticks, bytes) = encode_rows(source, writer, |_| progress.inc(1))?;
    progress.finish_with_message(format!("Encoded {ticks} ticks"));

    if !quiet {
        println!(
            "Output written to: {} ({}, {:.2} bytes/tick)",
            output.display(),
            format_bytes(bytes),
            (bytes - Header::SIZE as u64) as f64 / ticks.max(1) as f64
        );
    }
    Ok(())
}

/// Streams CSV rows from `source` into `writer`, returning the tick and byte
/// counts.
fn encode_rows<R: Read, W: Write>(
    source: R,
    mut writer: QcbWriter<W>,
    mut on_tick: impl FnMut(u64),
) -> Result<(u64, u64)> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    for (index, row) in csv.deserialize::<Row>().enumerate() {
        // Line 1 is the header row.
        let line = index + 2;
        let row = row.with_context(|| format!("Invalid row at line {line}"))?;
        writer
            .write_tick(row.timestamp, row.bid, row.ask)
            .with_context(|| format!("Cannot encode row at line {line}"))?;
        on_tick(writer.ticks_written());
    }

    let ticks = writer.ticks_written();
    let bytes = writer.bytes_written();
    writer.finish().context("Failed to flush output")?;
    tracing::info!(ticks, bytes, "Encoded QCB stream");
    Ok((ticks, bytes))
}
