use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use site_kpi::core::domain::{MaterialRecord, RawPourRecord};
use site_kpi::services::histogram::HistogramBinner;
use site_kpi::services::material_variance::MaterialVarianceCalculator;
use site_kpi::services::pour_kpis::DurationKpiCalculator;
use site_kpi::time::parse_timestamp;

fn timestamp(minutes: i64) -> String {
    let base = chrono::NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .unwrap();
    (base + chrono::Duration::minutes(minutes))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn pour_rows(count: usize) -> Vec<RawPourRecord> {
    (0..count as i64)
        .map(|i| {
            let start = i * 7;
            RawPourRecord {
                batch_start_time: Some(timestamp(start)),
                batch_end_time: Some(timestamp(start + 8 + i % 5)),
                departure_time: Some(timestamp(start + 15)),
                arrival_time: Some(timestamp(start + 40 + i % 11)),
                pouring_start_time: Some(timestamp(start + 55)),
                pouring_finish_time: Some(timestamp(start + 80 + i % 13)),
                quantity: Some(8.0 + (i % 4) as f64),
            }
        })
        .collect()
}

fn bench_timestamp_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("timestamp_parsing");

    let inputs = [
        ("iso", "2023-01-01T06:30:00"),
        ("iso_offset", "2023-01-01 06:30:00.250+02:00"),
        ("us_ampm", "01/01/2023 06:30 AM"),
        ("invalid", "not a timestamp"),
    ];
    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::new("parse", name), &input, |b, input| {
            b.iter(|| parse_timestamp(black_box(input)));
        });
    }

    group.finish();
}

fn bench_pour_kpis(c: &mut Criterion) {
    let mut group = c.benchmark_group("pour_kpis");

    for size in [100, 1_000, 10_000] {
        let rows = pour_rows(size);
        group.bench_with_input(BenchmarkId::new("compute", size), &rows, |b, rows| {
            b.iter(|| DurationKpiCalculator::compute(black_box(rows)));
        });
    }

    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");

    let binner = HistogramBinner::default();
    for size in [1_000, 100_000] {
        let values: Vec<Option<f64>> = (0..size)
            .map(|i| if i % 17 == 0 { None } else { Some((i % 241) as f64 * 0.37) })
            .collect();
        group.bench_with_input(BenchmarkId::new("bin", size), &values, |b, values| {
            b.iter(|| binner.bin(black_box(values).iter().copied()));
        });
    }

    group.finish();
}

fn bench_material_variance(c: &mut Criterion) {
    let mut group = c.benchmark_group("material_variance");

    let calculator = MaterialVarianceCalculator::default();
    let records: Vec<MaterialRecord> = (0..10_000)
        .map(|i| MaterialRecord::new(format!("mix-{}", i % 12), 100.0, 85.0 + (i % 31) as f64))
        .collect();
    group.bench_function("compute_10000", |b| {
        b.iter(|| calculator.compute(black_box(&records)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_timestamp_parsing,
    bench_pour_kpis,
    bench_histogram,
    bench_material_variance
);
criterion_main!(benches);
