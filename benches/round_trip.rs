use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sarch::{pack, unpack};
use std::hint::black_box;
use std::time::Duration;

fn generate_test_data(size: usize, pattern: &str) -> Vec<u8> {
    match pattern {
        "text" => {
            let base = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
            base.iter().copied().cycle().take(size).collect()
        }
        "binary" => (0..size).map(|i| ((i * 17 + 11) % 256) as u8).collect(),
        "repetitive" => {
            // Long runs, where RLE does most of the work
            (0..size).map(|i| b'A' + ((i / 500) % 8) as u8).collect()
        }
        "json" => {
            let template = br#"{"id":123,"name":"Example","values":[1,2,3,4,5],"active":true},"#;
            template.iter().copied().cycle().take(size).collect()
        }
        _ => panic!("Unknown pattern: {pattern}"),
    }
}

fn round_trip_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip_throughput");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for size in [1024, 10240, 102400, 1048576] {
        let size_label = match size {
            1024 => "1KB",
            10240 => "10KB",
            102400 => "100KB",
            1048576 => "1MB",
            _ => "unknown",
        };

        for pattern in ["text", "binary", "repetitive", "json"] {
            let data = generate_test_data(size, pattern);
            let benchmark_id = BenchmarkId::from_parameter(format!("{size_label}/{pattern}"));

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(benchmark_id, &data, |b, data| {
                b.iter(|| {
                    let archive =
                        pack(&[("bench.dat", black_box(data))]).expect("Packing failed");
                    let files = unpack(black_box(&archive)).expect("Unpacking failed");

                    // Verify round-trip integrity
                    assert_eq!(data.len(), files[0].1.len());
                    files
                });
            });
        }
    }

    group.finish();
}

fn round_trip_many_entries(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip_entries");
    group.measurement_time(Duration::from_secs(10));

    for count in [1usize, 16, 256] {
        let files: Vec<(String, Vec<u8>)> = (0..count)
            .map(|i| (format!("file-{i:04}.txt"), generate_test_data(4096, "text")))
            .collect();

        group.throughput(Throughput::Bytes((count * 4096) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &files, |b, files| {
            b.iter(|| {
                let archive = pack(black_box(files)).expect("Packing failed");
                unpack(black_box(&archive)).expect("Unpacking failed")
            });
        });
    }

    group.finish();
}

fn round_trip_data_integrity(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip_integrity");
    group.measurement_time(Duration::from_secs(5));

    let edge_cases = vec![
        ("empty", vec![]),
        ("single_byte", vec![b'X']),
        ("max_run", vec![b'R'; 255]),
        ("max_run_plus_1", vec![b'R'; 256]),
        ("all_values", (0..=255u8).collect()),
        (
            "alternating",
            (0..1000)
                .map(|i| if i % 2 == 0 { b'A' } else { b'B' })
                .collect(),
        ),
    ];

    for (name, data) in edge_cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let archive = pack(&[(name, black_box(data))]).expect("Packing failed");
                let files = unpack(black_box(&archive)).expect("Unpacking failed");

                // Verify exact match
                assert_eq!(data, &files[0].1);
                files
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    round_trip_throughput,
    round_trip_many_entries,
    round_trip_data_integrity
);
criterion_main!(benches);
