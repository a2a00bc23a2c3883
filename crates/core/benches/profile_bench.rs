//! Benchmarks for column profiling and datetime detection
//!
//! Run with: cargo bench -p table-fusion-core --bench profile_bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use table_fusion_core::dataset::{Column, Value};
use table_fusion_core::profile::{ColumnProfiler, parse_datetime};

/// Generate a text column of short city-like names with repeats
fn generate_text_column(count: usize) -> Column {
    let values = (0..count)
        .map(|i| match i % 7 {
            0 => Value::Null,
            1 => Value::from(format!("  Station {}  ", i % 50)),
            _ => Value::from(format!("North {} Street, Block {}", i % 120, i % 9)),
        })
        .collect();
    Column::new("address", values)
}

/// Generate a numeric column with a few outliers
fn generate_numeric_column(count: usize) -> Column {
    let values = (0..count)
        .map(|i| {
            if i % 97 == 0 {
                Value::Number(1.0e6)
            } else {
                Value::Number(100.0 + (i % 40) as f64 * 0.5)
            }
        })
        .collect();
    Column::new("reading", values)
}

fn bench_profile_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_column");
    let profiler = ColumnProfiler::new();

    for count in [100, 1_000, 10_000].iter() {
        let text = generate_text_column(*count);
        let numeric = generate_numeric_column(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("text", count), &text, |b, column| {
            b.iter(|| black_box(profiler.profile(column)));
        });
        group.bench_with_input(BenchmarkId::new("numeric", count), &numeric, |b, column| {
            b.iter(|| black_box(profiler.profile(column)));
        });
    }

    group.finish();
}

fn bench_datetime_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_datetime");

    let test_cases = vec![
        ("rfc3339", "2024-01-15T10:30:00Z"),
        ("seconds", "2024-01-15 10:30:00"),
        ("day", "15.01.2024"),
        ("month", "2024-01"),
        ("year", "2024"),
        ("not_a_date", "hello world"),
    ];

    for (name, value) in test_cases {
        group.bench_with_input(BenchmarkId::new("parse", name), &value, |b, value| {
            b.iter(|| black_box(parse_datetime(value)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_profile_columns, bench_datetime_parsing);
criterion_main!(benches);
