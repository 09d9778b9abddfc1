//! Verify command implementation.
//!
//! Decodes a file once as a whole and once per chunk size, and reports the
//! first tick where the two disagree.

use crate::display::{reader_config, tick_spinner};
use anyhow::{Context, Result, bail};
use qcb_lib::prelude::*;
use std::path::Path;

const DEFAULT_CHUNK_SIZES: [usize; 5] = [1, 2, 5, 34, 4096];

/// Outcome of decoding one file with one chunk size.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Match,
    Mismatch { index: usize },
    LengthDiffers { expected: usize, actual: usize },
}

/// Verify that chunked decoding of `path` matches whole-buffer decoding.
pub(crate) fn verify(path: &Path, chunk_sizes: &[usize], quiet: bool) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let chunk_sizes = if chunk_sizes.is_empty() {
        &DEFAULT_CHUNK_SIZES[..]
    } else {
        chunk_sizes
    };

    let (header, expected) = decode_all(&bytes).context("Whole-file decode failed")?;
    if !quiet {
        println!(
            "{} ticks, tick size {}, time slice {}",
            expected.len(),
            header.tick_size,
            header.time_slice_ticks
        );
    }

    let mut failures = 0;
    for &chunk_size in chunk_sizes {
        let progress = tick_spinner(quiet, &format!("chunk size {chunk_size}"))?;
        let outcome = compare(&bytes, chunk_size, &expected, |_| progress.inc(1))?;
        progress.finish_and_clear();

        match outcome {
            Outcome::Match => {
                if !quiet {
                    println!("chunk size {chunk_size:>6}: ok");
                }
            }
            Outcome::Mismatch { index } => {
                failures += 1;
                println!("chunk size {chunk_size:>6}: tick {index} differs");
            }
            Outcome::LengthDiffers { expected, actual } => {
                failures += 1;
                println!("chunk size {chunk_size:>6}: {actual} ticks, expected {expected}");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} chunk sizes disagree", chunk_sizes.len());
    }
    Ok(())
}

fn compare(
    bytes: &[u8],
    chunk_size: usize,
    expected: &[Tick],
    mut on_tick: impl FnMut(usize),
) -> Result<Outcome> {
    let reader = ChunkedTickReader::new(bytes, reader_config(chunk_size)?)?;
    let mut count = 0;
    for (index, tick) in reader.enumerate() {
        let tick = tick
            .with_context(|| format!("Chunk size {chunk_size}: decode failed at tick {index}"))?;
        if expected.get(index) != Some(&tick) {
            if index >= expected.len() {
                return Ok(Outcome::LengthDiffers {
                    expected: expected.len(),
                    actual: index + 1,
                });
            }
            return Ok(Outcome::Mismatch { index });
        }
        count += 1;
        on_tick(count);
    }
    if count != expected.len() {
        return Ok(Outcome::LengthDiffers {
            expected: expected.len(),
            actual: count,
        });
    }
    Ok(Outcome::Match)
}
