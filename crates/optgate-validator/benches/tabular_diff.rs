use criterion::{black_box, criterion_group, criterion_main, Criterion};
use optgate_core::{Cell, Dataset};
use optgate_validator::{GateProfile, Validator};

fn build(rows: usize, drift: f64) -> Dataset {
    let columns = vec![
        "portfolio_id".to_string(),
        "cashflow_month".to_string(),
        "amount".to_string(),
    ];
    let data = (0..rows)
        .map(|i| {
            vec![
                Cell::Text(format!("P{:05}", i % 500)),
                Cell::Text(format!("2024-{:02}", i % 12 + 1)),
                Cell::Number(i as f64 * 1.25 + if i % 97 == 0 { drift } else { 0.0 }),
            ]
        })
        .collect();
    Dataset::with_rows(columns, data).unwrap()
}

fn bench_tabular_diff(c: &mut Criterion) {
    let validator = Validator::new(GateProfile::strict());
    let baseline = build(50_000, 0.0);
    let identical = build(50_000, 0.0);
    let drifted = build(50_000, 0.01);

    c.bench_function("diff_identical_50k", |b| {
        b.iter(|| validator.compare_datasets(black_box(&baseline), black_box(&identical)))
    });
    c.bench_function("diff_drifted_50k", |b| {
        b.iter(|| validator.compare_datasets(black_box(&baseline), black_box(&drifted)))
    });
}

criterion_group!(benches, bench_tabular_diff);
criterion_main!(benches);
