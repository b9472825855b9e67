use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use provcrate_analyzer::{classify_accesses, common_paths};
use provcrate_core::types::{AccessRecord, Direction};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_records(n: usize) -> Vec<AccessRecord> {
    (0..n)
        .map(|i| {
            // A mix of true inputs, outputs, and intermediates across a
            // handful of job directories.
            let direction = match i % 4 {
                0 => Direction::In,
                1 => Direction::Out,
                2 => Direction::InOut,
                _ => Direction::In,
            };
            AccessRecord {
                uri: format!("file://node1/job/dir{}/file{}.dat", i % 16, i),
                direction,
            }
        })
        .collect()
}

fn make_uris(n: usize, branches: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("file://node1/data/branch{}/file{}.dat", i % branches, i))
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmark: classification
// ---------------------------------------------------------------------------

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_accesses");
    for count in [100, 1_000, 10_000] {
        let records = make_records(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| black_box(classify_accesses(records, "node1")));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: common-path resolution
// ---------------------------------------------------------------------------

fn bench_common_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("common_paths");
    for (count, branches) in [(100, 4), (1_000, 16), (10_000, 64)] {
        let uris = make_uris(count, branches);
        group.bench_with_input(
            BenchmarkId::new(format!("{count}uris_{branches}branches"), count),
            &uris,
            |b, uris| {
                b.iter(|| black_box(common_paths(uris)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_common_paths);
criterion_main!(benches);
