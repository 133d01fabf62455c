use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;
use sqlbind::{Builder, Cond, CondValue, Quoter, SelectItem, Where};

/// Build a statement with `n` projected columns and `n` equality conditions:
/// SELECT col0, col1, ... FROM t WHERE col0 = ? AND col1 = ? ...
fn build_select(n: usize) -> Builder {
    let mut b = Builder::new();
    let columns: Vec<SelectItem> = (0..n).map(|i| SelectItem::from(format!("col{i}"))).collect();
    b.select(columns).from("t", None);
    let mut cond = Cond::new();
    for i in 0..n {
        cond = cond.entry(format!("col{i}"), i as i64);
    }
    let _ = b.where_(cond);
    b
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build");

    for n in [1, 5, 10, 50, 100] {
        let b = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &b, |bench, b| {
            bench.iter(|| black_box(b.build()));
        });
    }

    group.finish();
}

fn bench_assemble_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/assemble_and_build");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                let b = build_select(n);
                black_box(b.build());
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let ids: Vec<CondValue> = (0..n).map(|i| CondValue::from(i as i64)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &ids, |bench, ids| {
            bench.iter(|| {
                let mut b = Builder::new();
                b.select_all().from("t", None);
                let _ = b.where_(Cond::new().entry("id", ids.clone()));
                black_box(b.build());
            });
        });
    }

    group.finish();
}

fn bench_json_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/json_tree");

    let tree = json!({
        "status": "active",
        "age": { "$gte": 18, "$lt": 60 },
        "role": ["admin", "editor", "viewer"],
        "$or": { "vip": true, "score": { "$gt": 90 } },
        "deleted_at": null,
    });

    group.bench_function("compile", |bench| {
        bench.iter(|| {
            let mut b = Builder::with_quoter(Quoter::backtick());
            b.select_all().from("user", None);
            let _ = b.where_(tree.clone());
            black_box(b.build());
        });
    });

    group.finish();
}

fn bench_fluent_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/fluent_chain");

    for n in [1, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                let mut b = Builder::new();
                b.select_all().from("t", None);
                b.where_fn(|w: &mut Where| {
                    for i in 0..n {
                        w.eq(&format!("col{i}"), i as i64);
                    }
                });
                black_box(b.build());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_assemble_and_build,
    bench_in_list,
    bench_json_tree,
    bench_fluent_chain
);
criterion_main!(benches);
