//! Benchmarks for the diary index
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use diary_index::{DiaryIndex, DiaryRecord, MemoryStore};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn create_test_records(count: usize) -> Vec<DiaryRecord> {
    (0..count)
        .map(|i| {
            // Scatter dates so the store order isn't already sorted
            let minutes = (i as i64 * 7919) % (count as i64 * 60);
            DiaryRecord::new(format!("Entry {}", i), "Some diary text", base() + Duration::minutes(minutes))
                .id(format!("id-{}", i))
                .tags(["bench"])
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("build");

    for size in [1_000, 10_000, 100_000] {
        let store = MemoryStore::with_records(create_test_records(size));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| {
                let mut index = DiaryIndex::new();
                runtime.block_on(index.build_index(store));
                black_box(index.len())
            })
        });
    }

    group.finish();
}

fn bench_locator(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryStore::with_records(create_test_records(100_000));
    let mut index = DiaryIndex::new();
    runtime.block_on(index.build_index(&store));

    let mut group = c.benchmark_group("locator");

    group.bench_function("find_insert_index", |b| {
        let date = base() + Duration::days(30);
        b.iter(|| index.find_insert_index(black_box(date)))
    });

    group.bench_function("find_range_by_date_range", |b| {
        let start = base() + Duration::days(10);
        let end = base() + Duration::days(40);
        b.iter(|| index.find_range_by_date_range(black_box(start), black_box(end)))
    });

    group.finish();
}

fn bench_mutator(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryStore::with_records(create_test_records(10_000));
    let mut index = DiaryIndex::new();
    runtime.block_on(index.build_index(&store));

    let mut group = c.benchmark_group("mutator");

    group.bench_function("insert_remove", |b| {
        let record = DiaryRecord::new("New", "Fresh entry", base() + Duration::days(3)).id("bench-new");
        b.iter(|| {
            index.insert_entry(black_box(&record)).unwrap();
            index.remove_entry(black_box("bench-new"))
        })
    });

    group.bench_function("update_entry_date", |b| {
        let early = DiaryRecord::new("Move", "", base()).id("id-42");
        let late = early.clone().date(base() + Duration::days(5));
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let record = if flip { &late } else { &early };
            index.update_entry_date(black_box(record)).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_locator, bench_mutator);
criterion_main!(benches);
