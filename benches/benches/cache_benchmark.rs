//! Dedup and cache replacement benchmarks.
//!
//! Run with: `cargo bench --package aqstream-bench`

use aqstream_bench::SyntheticDay;
use aqstream_lib::{CacheStore, dedup_records};
use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tempfile::TempDir;

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()
}

fn dedup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup");

    for size in SIZES {
        let records = SyntheticDay {
            date: day(),
            records: size,
            duplicate_every: 10,
        }
        .generate();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| dedup_records(records.iter().cloned()));
        });
    }

    group.finish();
}

fn replace_all_benchmark(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheStore::new(temp_dir.path().to_path_buf()).unwrap();

    let mut group = c.benchmark_group("replace_all");
    group.sample_size(20);

    for size in SIZES {
        let records = SyntheticDay::unique(day(), size).generate();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| cache.replace_all(day(), records.iter().cloned()).unwrap());
        });
    }

    group.finish();
}

fn read_all_benchmark(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheStore::new(temp_dir.path().to_path_buf()).unwrap();

    let mut group = c.benchmark_group("read_all");

    for size in SIZES {
        cache
            .replace_all(day(), SyntheticDay::unique(day(), size).generate())
            .unwrap();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| cache.read_all(day()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, dedup_benchmark, replace_all_benchmark, read_all_benchmark);
criterion_main!(benches);
