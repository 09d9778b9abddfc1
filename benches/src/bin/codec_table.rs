//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package qcb-bench --bin codec_table --release`

use qcb_bench::{
    BenchmarkResult, Workload, format_bytes, format_duration, measure_chunked, measure_encode,
    measure_sequential,
};
use std::num::NonZeroUsize;

/// Number of iterations per benchmark for statistical significance.
const ITERATIONS: usize = 5;

const TICK_COUNTS: [usize; 3] = [10_000, 100_000, 1_000_000];

const CHUNK_SIZES: [usize; 3] = [64, 4_096, 65_536];

fn main() {
    println!("QCB Codec Benchmark");
    println!("===================\n");
    println!("Running benchmarks ({ITERATIONS} iterations each)...\n");

    println!("| Ticks | Encoded | Bytes/tick | Operation | Time | Ticks/s | MB/s |");
    println!("|-------|---------|------------|-----------|------|---------|------|");

    for ticks in TICK_COUNTS {
        let workload = Workload::forex(ticks);
        let rows = workload.generate();
        let bytes = workload.encode();

        let mut runs: Vec<Vec<BenchmarkResult>> = vec![
            (0..ITERATIONS)
                .map(|_| measure_encode(&workload.header, &rows))
                .collect(),
            (0..ITERATIONS).map(|_| measure_sequential(&bytes)).collect(),
        ];
        for chunk_size in CHUNK_SIZES.iter().filter_map(|&c| NonZeroUsize::new(c)) {
            runs.push(
                (0..ITERATIONS)
                    .map(|_| measure_chunked(&bytes, chunk_size))
                    .collect(),
            );
        }

        for results in &runs {
            let avg = average_results(results);
            println!(
                "| {} | {} | {:.2} | {} | {} | {:.0} | {:.1} |",
                ticks,
                format_bytes(avg.encoded_size),
                avg.encoded_size as f64 / ticks as f64,
                avg.operation,
                format_duration(avg.duration),
                avg.ticks_per_sec(),
                avg.throughput_mbps(),
            );
        }
    }

    println!("\n*Synthetic forex random walk, 0.00001 tick size, 1ms time slices*");
}

fn average_results(results: &[BenchmarkResult]) -> BenchmarkResult {
    let total = results
        .iter()
        .map(|r| r.duration)
        .sum::<std::time::Duration>();
    let mut avg = results[0].clone();
    avg.duration = total / results.len() as u32;
    avg
}
