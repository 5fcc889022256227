use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use structq::prelude::*;

#[derive(Debug, Clone, Table, FromRow)]
#[orm(table = "invoices")]
pub struct Invoice {
    pub id: i64,
    pub created: i64,
    pub memo: String,
    pub person_id: i64,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Table, FromRow)]
#[orm(table = "people")]
pub struct Person {
    pub id: i64,
    pub name: String,
}

fn db() -> DbMap {
    let mut db = DbMap::new(DialectKind::Postgres);
    db.add_table::<Invoice>();
    db.add_table::<Person>();
    db
}

/// Plan construction plus rendering of a joined SELECT with `n` WHERE terms.
fn bench_build_and_render(c: &mut Criterion) {
    let db = db();
    let mut group = c.benchmark_group("render/build_and_render");

    for n in [1, 5, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let inv = Invoice::reference();
                let person = Person::reference();
                let mut query = db
                    .query(&(), &inv)
                    .join(&person)
                    .equal(inv.person_id, person.id)
                    .where_();
                for i in 0..n {
                    query = query.greater(inv.created, i as i64);
                }
                black_box(query.order_by(inv.id, "desc").limit(10).select_statement())
            });
        });
    }

    group.finish();
}

/// Rendering an already built plan, which restarts bind numbering each time.
fn bench_render_only(c: &mut Criterion) {
    let db = db();
    let mut group = c.benchmark_group("render/select_statement");

    for n in [1, 10, 100] {
        let inv = Invoice::reference();
        let query = db
            .query(&(), &inv)
            .where_()
            .in_list(inv.id, 0..n as i64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| black_box(query.select_statement()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_and_render, bench_render_only);
criterion_main!(benches);
