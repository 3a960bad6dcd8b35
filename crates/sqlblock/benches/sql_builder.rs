use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlblock::{Expr, Select, dialect};

/// SELECT col0, col1, ... FROM t WHERE (col0 = $1) AND (col1 = $2) ...
fn build_select(n: usize) -> Select {
    let mut q = dialect("postgres").unwrap().select();
    for i in 0..n {
        q = q.field(&format!("col{i}")).unwrap();
    }
    q = q.from("t").unwrap();
    for i in 0..n {
        q = q.where_(Expr::eq(format!("col{i}"), i as i64));
    }
    q
}

/// `depth` levels of FROM sub-queries, each with one bound value.
fn build_nested(depth: usize) -> Select {
    let pg = dialect("postgres").unwrap();
    let mut q = pg.select().from("base").unwrap().where_(Expr::eq("lvl", 0i64));
    for lvl in 1..=depth {
        q = pg
            .select()
            .from_as(q, &format!("s{lvl}"))
            .unwrap()
            .where_(Expr::eq("lvl", lvl as i64));
    }
    q
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/to_sql");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.to_sql().unwrap()));
        });
    }

    group.finish();
}

fn bench_to_param(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/to_param");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.to_param().unwrap()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let q = build_select(n);
                black_box(q.to_param().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let q = dialect("postgres")
                    .unwrap()
                    .select()
                    .from("t")
                    .unwrap()
                    .where_(Expr::in_list("id", values.clone()));
                black_box(q.to_param().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/nested");

    for depth in [1, 4, 16] {
        let q = build_nested(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &q, |b, q| {
            b.iter(|| black_box(q.to_param().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_to_sql,
    bench_to_param,
    bench_build_and_render,
    bench_in_list,
    bench_nested
);
criterion_main!(benches);
