//! Encode and decode throughput benchmarks.
//!
//! Run with: `cargo bench --package qcb-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use qcb_bench::Workload;
use qcb_lib::prelude::*;
use std::hint::black_box;
use std::io::Write;
use std::num::NonZeroUsize;

const TICKS: usize = 100_000;

fn encode_benchmark(c: &mut Criterion) {
    let workload = Workload::forex(TICKS);
    let rows = workload.generate();

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(TICKS as u64));
    group.bench_function("forex", |b| {
        b.iter(|| encode_all(&workload.header, black_box(&rows).iter().copied()).unwrap());
    });
    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let bytes = Workload::forex(TICKS).encode();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(TICKS as u64));

    group.bench_function("sequential", |b| {
        b.iter(|| decode_all(black_box(&bytes)).unwrap());
    });

    for chunk_size in [1, 34, 4_096, 65_536] {
        let config =
            ReaderConfig::default().with_chunk_size(NonZeroUsize::new(chunk_size).unwrap());
        group.bench_with_input(BenchmarkId::new("chunked", chunk_size), &config, |b, config| {
            b.iter(|| {
                let reader = ChunkedTickReader::new(black_box(bytes.as_slice()), *config).unwrap();
                reader.map(|tick| tick.unwrap()).count()
            });
        });
    }

    group.finish();
}

fn file_benchmark(c: &mut Criterion) {
    let bytes = Workload::forex(TICKS).encode();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let mut group = c.benchmark_group("file");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("chunked_default", |b| {
        b.iter(|| {
            let reader = ChunkedTickReader::open(file.path(), ReaderConfig::default()).unwrap();
            reader.map(|tick| tick.unwrap()).count()
        });
    });
    group.finish();
}

criterion_group!(benches, encode_benchmark, decode_benchmark, file_benchmark);
criterion_main!(benches);
