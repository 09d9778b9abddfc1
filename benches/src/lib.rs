//! Benchmark utilities for qcb.

use qcb_lib::prelude::*;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Result of a single benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Name of the operation being measured.
    pub operation: String,
    /// Wall-clock duration.
    pub duration: Duration,
    /// Encoded stream size in bytes, header included.
    pub encoded_size: u64,
    /// Number of ticks processed.
    pub ticks: u64,
}

impl BenchmarkResult {
    /// Calculate throughput in MB/s of encoded bytes.
    pub fn throughput_mbps(&self) -> f64 {
        let bytes = self.encoded_size as f64;
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (bytes / 1_000_000.0) / secs
        } else {
            0.0
        }
    }

    /// Calculate ticks per second.
    pub fn ticks_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 { self.ticks as f64 / secs } else { 0.0 }
    }
}

/// Shape of a synthetic tick stream.
#[derive(Debug, Clone)]
pub struct Workload {
    /// Number of ticks.
    pub ticks: usize,
    /// Stream header.
    pub header: Header,
    /// Seed for the deterministic random walk.
    pub seed: u64,
}

impl Workload {
    /// A forex-like workload: 0.00001 pipettes, 1ms time slices.
    pub fn forex(ticks: usize) -> Self {
        Self {
            ticks,
            header: Header {
                version: qcb_lib::FORMAT_VERSION,
                flags: 0,
                tick_size: Decimal::new(1, 5),
                time_slice_ticks: 10_000,
            },
            seed: 0x9E37_79B9_7F4A_7C15,
        }
    }

    /// Generates the (timestamp, bid, ask) rows of this workload.
    ///
    /// Mostly small moves with rare large gaps, so every delta width occurs.
    pub fn generate(&self) -> Vec<(i64, Decimal, Decimal)> {
        let mut state = self.seed.max(1);
        let mut timestamp = 638_400_000_000_000_000_i64;
        let mut bid = 108_000_i64;
        let mut spread = 2_i64;
        let mut rows = Vec::with_capacity(self.ticks);

        for _ in 0..self.ticks {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;

            timestamp += match state % 100 {
                0 => (state >> 8) as i64 % 36_000_000_000,
                1..=9 => (state >> 8) as i64 % 10_000_000,
                _ => (state >> 8) as i64 % 2_000_000,
            };
            if state & 0x30 != 0 {
                bid += ((state >> 20) % 7) as i64 - 3;
            }
            spread = (spread + ((state >> 40) % 3) as i64 - 1).clamp(0, 20);
            rows.push((timestamp, Decimal::new(bid, 5), Decimal::new(bid + spread, 5)));
        }
        rows
    }

    /// Encodes the workload into an in-memory stream.
    ///
    /// # Panics
    ///
    /// Panics if the synthetic rows cannot be encoded, which would be a bug in
    /// the generator.
    pub fn encode(&self) -> Vec<u8> {
        encode_all(&self.header, self.generate()).expect("synthetic workload encodes")
    }
}

/// Time encoding of `rows`.
pub fn measure_encode(header: &Header, rows: &[(i64, Decimal, Decimal)]) -> BenchmarkResult {
    let start = Instant::now();
    let bytes = encode_all(header, rows.iter().copied()).expect("synthetic workload encodes");
    BenchmarkResult {
        operation: "encode".to_string(),
        duration: start.elapsed(),
        encoded_size: bytes.len() as u64,
        ticks: rows.len() as u64,
    }
}

/// Time whole-buffer decoding of `bytes`.
pub fn measure_sequential(bytes: &[u8]) -> BenchmarkResult {
    let start = Instant::now();
    let (_, ticks) = decode_all(bytes).expect("synthetic workload decodes");
    BenchmarkResult {
        operation: "sequential".to_string(),
        duration: start.elapsed(),
        encoded_size: bytes.len() as u64,
        ticks: ticks.len() as u64,
    }
}

/// Time chunked decoding of `bytes` at the given chunk size.
pub fn measure_chunked(bytes: &[u8], chunk_size: NonZeroUsize) -> BenchmarkResult {
    let config = ReaderConfig::default().with_chunk_size(chunk_size);
    let start = Instant::now();
    let reader = ChunkedTickReader::new(bytes, config).expect("synthetic workload has a header");
    let mut count = 0u64;
    for tick in reader {
        tick.expect("synthetic workload decodes");
        count += 1;
    }
    BenchmarkResult {
        operation: format!("chunked/{chunk_size}"),
        duration: start.elapsed(),
        encoded_size: bytes.len() as u64,
        ticks: count,
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1_000 {
        format!("{micros}µs")
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1_000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

/// Format bytes for display.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1_024 {
        format!("{bytes} B")
    } else if bytes < 1_024 * 1_024 {
        format!("{:.1} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1_024.0 * 1_024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_is_deterministic() {
        let workload = Workload::forex(500);
        assert_eq!(workload.generate(), workload.generate());
        assert_eq!(workload.generate().len(), 500);
    }

    #[test]
    fn test_measurements_agree() {
        let workload = Workload::forex(2_000);
        let rows = workload.generate();
        let bytes = workload.encode();

        assert_eq!(measure_encode(&workload.header, &rows).encoded_size, bytes.len() as u64);
        assert_eq!(measure_sequential(&bytes).ticks, 2_000);
        let chunk = NonZeroUsize::new(7).unwrap();
        assert_eq!(measure_chunked(&bytes, chunk).ticks, 2_000);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(12)), "12µs");
        assert_eq!(format_duration(Duration::from_millis(3)), "3.00ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
    }
}
