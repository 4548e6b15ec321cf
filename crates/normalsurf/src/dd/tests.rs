use super::*;
use crate::encoding::{NormalCoords, NormalEncoding};
use crate::int::exact_vec;
use crate::matching::make_matching_equations;
use crate::triangulation::catalog::*;
use crate::triangulation::Triangulation;

fn rays(tri: &Triangulation, coords: NormalCoords) -> Vec<Vec<ExactInt>> {
    let eqns = make_matching_equations(tri, coords).unwrap();
    let vc = ValidityConstraints::for_encoding(NormalEncoding::new(coords), tri.size());
    let mut out = Vec::new();
    enumerate_extremal_rays(&eqns, &vc, None, |v| out.push(v)).unwrap();
    out
}

#[test]
fn smoke_one_tetrahedron() {
    assert_eq!(rays(&one_tetrahedron(), NormalCoords::Standard).len(), 7);
    assert_eq!(rays(&one_tetrahedron(), NormalCoords::Quad).len(), 3);
    assert_eq!(rays(&one_tetrahedron(), NormalCoords::AlmostNormal).len(), 10);
}

#[test]
fn catalog_counts() {
    let cases = [
        (layered_loop(1), NormalCoords::Standard, 3),
        (layered_loop(1), NormalCoords::Quad, 1),
        (layered_loop(1), NormalCoords::AlmostNormal, 4),
        (layered_loop(2), NormalCoords::Standard, 5),
        (layered_loop(2), NormalCoords::Quad, 3),
        (gieseking(), NormalCoords::Standard, 1),
        (gieseking(), NormalCoords::Quad, 0),
        (twisted_kxi(), NormalCoords::Standard, 8),
        (twisted_kxi(), NormalCoords::Quad, 6),
        (figure_eight(), NormalCoords::Standard, 1),
        (figure_eight(), NormalCoords::Quad, 4),
    ];
    for (tri, coords, expect) in cases {
        assert_eq!(rays(&tri, coords).len(), expect, "{coords:?} on {tri:?}");
    }
}

#[test]
fn figure_eight_quad_rays_are_primitive_and_known() {
    let mut got = rays(&figure_eight(), NormalCoords::Quad);
    got.sort();
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
fn unconstrained_cone_has_more_rays() {
    let tri = figure_eight();
    let eqns = make_matching_equations(&tri, NormalCoords::Quad).unwrap();
    let mut n = 0;
    enumerate_extremal_rays(&eqns, &ValidityConstraints::none(), None, |_| n += 1).unwrap();
    assert!(n > 4);
}

#[test]
fn cancelled_run_emits_nothing() {
    let tri = layered_loop(3);
    let eqns = make_matching_equations(&tri, NormalCoords::Standard).unwrap();
    let vc = ValidityConstraints::for_encoding(NormalEncoding::new(NormalCoords::Standard), 3);
    let tracker = ProgressTracker::new();
    tracker.cancel();
    let mut n = 0;
    let res = enumerate_extremal_rays(&eqns, &vc, Some(&tracker), |_| n += 1);
    assert_eq!(res, Err(crate::Error::Cancelled));
    assert_eq!(n, 0);
}
