//! Benchmarks for record sorting and in-memory audits.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stackaudit::core::{sort_records, REGION_CATALOG};
use stackaudit::testing::{record, sample_world};
use stackaudit::conditions::Conditions;
use stackaudit::Auditor;
use std::sync::Arc;

fn sort_benchmark(c: &mut Criterion) {
    let records: Vec<_> = (0..1_000)
        .rev()
        .map(|i| record(&format!("stack-{i:04}"), REGION_CATALOG[i % REGION_CATALOG.len()], "{}"))
        .collect();

    c.bench_function("sort_1000_records", |b| {
        b.iter(|| {
            let mut batch = records.clone();
            sort_records(black_box(&mut batch));
            batch
        })
    });
}

fn world_wide_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let auditor = Auditor::new(Arc::new(sample_world(&REGION_CATALOG, 20)));
    let conditions = Conditions::new().with_filter_fn(|body| body.contains("/1"));

    c.bench_function("world_wide_in_memory", |b| {
        b.iter(|| {
            runtime
                .block_on(auditor.get_world_wide_templates(black_box(&conditions)))
                .unwrap()
        })
    });
}

criterion_group!(benches, sort_benchmark, world_wide_benchmark);
criterion_main!(benches);
