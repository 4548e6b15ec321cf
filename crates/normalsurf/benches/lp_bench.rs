//! Criterion benchmarks for the tree traversal engine and its tableaux.
//! Compares native and exact tableau integers on the same searches.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use normalsurf::encoding::NormalCoords;
use normalsurf::int::ExactInt;
use normalsurf::lp::hadamard::LpIntKind;
use normalsurf::lp::{BanNone, LpConstraintEulerPositive, LpConstraintNone};
use normalsurf::triangulation::catalog;
use normalsurf::tree::{tree_single, tree_vertices};

fn count_vertices(
    tri: &normalsurf::triangulation::Triangulation,
    coords: NormalCoords,
    kind: LpIntKind,
) -> usize {
    let mut n = 0usize;
    let mut sink = |_: Vec<ExactInt>| n += 1;
    let _ = tree_vertices::<LpConstraintNone, BanNone>(tri, coords, kind, None, &mut sink);
    n
}

fn bench_tree_ints(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_vertices");
    for &n in &[3usize, 6] {
        let tri = catalog::layered_loop(n);
        for kind in [LpIntKind::I64, LpIntKind::I128, LpIntKind::Exact] {
            group.bench_with_input(BenchmarkId::new(kind.name(), n), &tri, |b, tri| {
                b.iter(|| count_vertices(tri, NormalCoords::Standard, kind))
            });
        }
    }
    group.finish();
}

fn bench_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_single");
    let tri = catalog::layered_loop(1);
    for kind in [LpIntKind::I64, LpIntKind::Exact] {
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                let coords = NormalCoords::AlmostNormal;
                tree_single::<LpConstraintEulerPositive, BanNone>(&tri, coords, kind, true, None)
                    .map(|v| v.is_some())
                    .unwrap_or(false)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tree_ints, bench_single);
criterion_main!(benches);
