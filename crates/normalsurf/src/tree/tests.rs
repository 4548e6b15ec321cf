use std::sync::Arc;

use super::*;
use crate::dd::enumerate_extremal_rays;
use crate::encoding::NormalEncoding;
use crate::int::exact_vec;
use crate::lp::{BanNone, LpConstraintEulerPositive, LpConstraintNonSpun, LpConstraintNone};
use crate::matching::{euler_char_functional, make_matching_equations, CuspLinkCurves};
use crate::triangulation::catalog::*;
use crate::triangulation::random::{random_gluing, RandomCfg, ReplayToken};
use crate::validity::ValidityConstraints;
use proptest::prelude::*;

fn by_dd(tri: &Triangulation, coords: NormalCoords) -> Vec<Vec<ExactInt>> {
    let eqns = make_matching_equations(tri, coords).unwrap();
    let vc = ValidityConstraints::for_encoding(NormalEncoding::new(coords), tri.size());
    let mut out = Vec::new();
    enumerate_extremal_rays(&eqns, &vc, None, |v| out.push(v)).unwrap();
    out.sort();
    out
}

fn by_tree<C: LpConstraint>(
    tri: &Triangulation,
    coords: NormalCoords,
    kind: LpIntKind,
) -> Vec<Vec<ExactInt>> {
    let mut out = Vec::new();
    tree_vertices::<C, BanNone>(tri, coords, kind, None, &mut |v| out.push(v)).unwrap();
    out.sort();
    out
}

fn with_cusp_curves(mut tri: Triangulation) -> Triangulation {
    tri.set_peripheral_curves(Arc::new(CuspLinkCurves));
    tri
}

fn cusped_four_tet() -> Triangulation {
    with_cusp_curves(Triangulation::rehydrate(CUSPED_FOUR_TET_DEHYDRATION).unwrap())
}

#[test]
fn smoke_one_tetrahedron() {
    let tri = one_tetrahedron();
    let count = |coords| by_tree::<LpConstraintNone>(&tri, coords, LpIntKind::I64).len();
    assert_eq!(count(NormalCoords::Standard), 7);
    assert_eq!(count(NormalCoords::Quad), 3);
    assert_eq!(count(NormalCoords::AlmostNormal), 10);
}

#[test]
fn tree_agrees_with_double_description_on_catalog() {
    let cases = [
        (layered_loop(1), NormalCoords::Standard),
        (layered_loop(1), NormalCoords::AlmostNormal),
        (layered_loop(2), NormalCoords::Standard),
        (layered_loop(2), NormalCoords::Quad),
        (layered_loop(3), NormalCoords::Quad),
        (gieseking(), NormalCoords::Standard),
        (gieseking(), NormalCoords::Quad),
        (twisted_kxi(), NormalCoords::Standard),
        (twisted_kxi(), NormalCoords::Quad),
        (figure_eight(), NormalCoords::Standard),
        (figure_eight(), NormalCoords::Quad),
        (figure_eight(), NormalCoords::QuadOct),
        (rp3_two_tet(), NormalCoords::AlmostNormal),
    ];
    for (tri, coords) in cases {
        let dd = by_dd(&tri, coords);
        for kind in [LpIntKind::I64, LpIntKind::Exact] {
            let got = by_tree::<LpConstraintNone>(&tri, coords, kind);
            assert_eq!(got, dd, "{coords:?} {}", kind.name());
        }
    }
}

#[test]
fn figure_eight_quad_vertices_are_known() {
    let got = by_tree::<LpConstraintNone>(&figure_eight(), NormalCoords::Quad, LpIntKind::I128);
    let mut want = vec![
        exact_vec(&[0, 1, 0, 2, 0, 0]),
        exact_vec(&[0, 1, 0, 0, 2, 0]),
        exact_vec(&[2, 0, 0, 0, 0, 1]),
        exact_vec(&[0, 0, 2, 0, 0, 1]),
    ];
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn rp3_counts() {
    let tri = rp3_two_tet();
    let count = |c| by_tree::<LpConstraintNone>(&tri, c, LpIntKind::I64).len();
    assert_eq!(count(NormalCoords::Standard), 4);
    assert_eq!(count(NormalCoords::Quad), 2);
    assert_eq!(count(NormalCoords::QuadOct), 4);
    assert_eq!(count(NormalCoords::AlmostNormal), 6);
}

#[test]
fn closed_variants_agree_with_double_description() {
    let fig8 = with_cusp_curves(figure_eight());
    let cusped = cusped_four_tet();
    for (tri, count) in [(&fig8, 0), (&cusped, 4)] {
        for coords in [NormalCoords::QuadClosed, NormalCoords::QuadOctClosed] {
            let eqns = make_matching_equations(tri, coords).unwrap();
            let got = by_tree::<LpConstraintNonSpun>(tri, coords, LpIntKind::Exact);
            assert_eq!(got, by_dd(tri, coords), "{coords:?}");
            assert_eq!(got.len(), count, "{coords:?}");
            assert!(got.iter().all(|v| eqns.is_satisfied_by(v)));
        }
    }
}

#[test]
fn non_spun_search_cancelled_mid_run_keeps_what_it_found() {
    let tri = cusped_four_tet();
    let tracker = ProgressTracker::new();
    let mut got = Vec::new();
    let res = tree_vertices::<LpConstraintNonSpun, BanNone>(
        &tri,
        NormalCoords::QuadClosed,
        LpIntKind::Exact,
        Some(&tracker),
        &mut |v| {
            got.push(v);
            tracker.cancel();
        },
    );
    assert_eq!(res, Err(Error::Cancelled));
    assert_eq!(got.len(), 1);
    let eqns = make_matching_equations(&tri, NormalCoords::QuadClosed).unwrap();
    assert!(eqns.is_satisfied_by(&got[0]));
}

#[test]
fn euler_positive_vertices_have_positive_euler_characteristic() {
    let tri = layered_loop(2);
    let chi = euler_char_functional(&tri, NormalEncoding::new(NormalCoords::Standard)).unwrap();
    let got = by_tree::<LpConstraintEulerPositive>(&tri, NormalCoords::Standard, LpIntKind::Exact);
    assert!(!got.is_empty());
    for v in got {
        let x: ExactInt = chi.iter().zip(&v).map(|(&c, x)| x * c).sum();
        assert!(x.is_positive(), "{v:?}");
    }
}

#[test]
fn cancelled_search_stops() {
    let tracker = ProgressTracker::new();
    tracker.cancel();
    let mut n = 0;
    let res = tree_vertices::<LpConstraintNone, BanNone>(
        &layered_loop(3),
        NormalCoords::Standard,
        LpIntKind::I64,
        Some(&tracker),
        &mut |_| n += 1,
    );
    assert_eq!(res, Err(Error::Cancelled));
    assert_eq!(n, 0);
}

#[test]
fn single_solution_finds_octagon_in_s3() {
    let tri = layered_loop(1);
    let v = tree_single::<LpConstraintEulerPositive, BanNone>(
        &tri,
        NormalCoords::AlmostNormal,
        LpIntKind::Exact,
        true,
        None,
    )
    .unwrap()
    .expect("S³ has an almost normal sphere");
    assert!(v[7..10].iter().any(|x| x.is_positive()));
    let chi = euler_char_functional(&tri, NormalEncoding::new(NormalCoords::AlmostNormal)).unwrap();
    let x: ExactInt = chi.iter().zip(&v).map(|(&c, x)| x * c).sum();
    assert!(x.is_positive());
    assert!(v[..4].iter().any(|x| x.is_zero()));
}

#[test]
fn single_solution_in_a_ball_avoids_vertex_links() {
    let v = tree_single::<LpConstraintEulerPositive, BanNone>(
        &one_tetrahedron(),
        NormalCoords::Standard,
        LpIntKind::I64,
        false,
        None,
    )
    .unwrap()
    .expect("a ball contains normal discs");
    assert!(v[..4].iter().any(|x| x.is_zero()));
    assert!(v.iter().any(|x| x.is_positive()));
}

#[test]
fn octagon_required_without_octagons_finds_nothing() {
    let res = tree_single::<LpConstraintEulerPositive, BanNone>(
        &layered_loop(1),
        NormalCoords::Standard,
        LpIntKind::I64,
        true,
        None,
    )
    .unwrap();
    assert_eq!(res, None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn tree_matches_dd_on_random_gluings(seed in any::<u64>(), n in 1usize..=3) {
        let cfg = RandomCfg { tetrahedra: n, ..RandomCfg::default() };
        let tri = random_gluing(cfg, ReplayToken::new(seed, 0));
        for coords in [NormalCoords::Standard, NormalCoords::Quad] {
            let tree = by_tree::<LpConstraintNone>(&tri, coords, LpIntKind::Exact);
            prop_assert_eq!(tree, by_dd(&tri, coords));
        }
    }
}
