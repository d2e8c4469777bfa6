//! Async filesystem benchmarks for SARCH
//!
//! Compares the tokio-based pack/unpack helpers against the synchronous ones
//! on the same files.

#![cfg(feature = "async")]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Runtime;

fn generate_test_data(size: usize) -> Vec<u8> {
    let pattern = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
    pattern.iter().copied().cycle().take(size).collect()
}

fn write_inputs(dir: &TempDir, count: usize, size: usize) -> Vec<PathBuf> {
    let data = generate_test_data(size);
    (0..count)
        .map(|i| {
            let path = dir.path().join(format!("input-{i}.txt"));
            std::fs::write(&path, &data).expect("Failed to write input");
            path
        })
        .collect()
}

fn pack_sync_vs_async(c: &mut Criterion) {
    let rt = Runtime::new().expect("Failed to start runtime");
    let mut group = c.benchmark_group("async_pack");
    group.measurement_time(Duration::from_secs(10));

    for (count, size) in [(4usize, 262144usize), (32, 16384)] {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let inputs = write_inputs(&dir, count, size);
        let archive = dir.path().join("bench.sarch");
        let label = format!("{count}x{}KB", size / 1024);

        group.throughput(Throughput::Bytes((count * size) as u64));
        group.bench_with_input(BenchmarkId::new("sync", &label), &inputs, |b, inputs| {
            b.iter(|| sarch::fs::pack_files(inputs, &archive).expect("Packing failed"));
        });
        group.bench_with_input(BenchmarkId::new("async", &label), &inputs, |b, inputs| {
            b.iter(|| {
                rt.block_on(sarch::async_fs::pack_files(inputs, &archive))
                    .expect("Packing failed")
            });
        });
    }

    group.finish();
}

fn unpack_sync_vs_async(c: &mut Criterion) {
    let rt = Runtime::new().expect("Failed to start runtime");
    let mut group = c.benchmark_group("async_unpack");
    group.measurement_time(Duration::from_secs(10));

    let dir = TempDir::new().expect("Failed to create temp dir");
    let inputs = write_inputs(&dir, 8, 131072);
    let archive = dir.path().join("bench.sarch");
    sarch::fs::pack_files(&inputs, &archive).expect("Packing failed");
    let out_dir = dir.path().join("out");

    group.throughput(Throughput::Bytes(8 * 131072));
    group.bench_function("sync", |b| {
        b.iter(|| sarch::fs::unpack_files(&archive, &out_dir).expect("Unpacking failed"));
    });
    group.bench_function("async", |b| {
        b.iter(|| {
            rt.block_on(sarch::async_fs::unpack_files(&archive, &out_dir))
                .expect("Unpacking failed")
        });
    });

    group.finish();
}

criterion_group!(benches, pack_sync_vs_async, unpack_sync_vs_async);
criterion_main!(benches);
