use super::*;
use crate::dd::enumerate_extremal_rays;
use crate::encoding::{NormalCoords, NormalEncoding};
use crate::int::exact_vec;
use crate::matching::make_matching_equations;
use crate::triangulation::catalog::*;
use crate::triangulation::Triangulation;
use crate::Error;

type Engine = fn(&MatchingEquations, &ValidityConstraints) -> Vec<Vec<ExactInt>>;

fn setup(tri: &Triangulation, coords: NormalCoords) -> (MatchingEquations, ValidityConstraints) {
    let eqns = make_matching_equations(tri, coords).unwrap();
    let vc = ValidityConstraints::for_encoding(NormalEncoding::new(coords), tri.size());
    (eqns, vc)
}

fn sorted(mut v: Vec<Vec<ExactInt>>) -> Vec<Vec<ExactInt>> {
    v.sort();
    v
}

fn dual(e: &MatchingEquations, c: &ValidityConstraints) -> Vec<Vec<ExactInt>> {
    let mut out = Vec::new();
    hilbert_dual(e, c, None, |v| out.push(v)).unwrap();
    sorted(out)
}

fn fullcone(e: &MatchingEquations, c: &ValidityConstraints) -> Vec<Vec<ExactInt>> {
    let mut out = Vec::new();
    hilbert_fullcone(e, c, None, |v| out.push(v)).unwrap();
    sorted(out)
}

fn cd(e: &MatchingEquations, c: &ValidityConstraints) -> Vec<Vec<ExactInt>> {
    let mut out = Vec::new();
    hilbert_cd(e, c, None, |v| out.push(v)).unwrap();
    sorted(out)
}

fn vertices(e: &MatchingEquations, c: &ValidityConstraints) -> Vec<Vec<ExactInt>> {
    let mut out = Vec::new();
    enumerate_extremal_rays(e, c, None, |v| out.push(v)).unwrap();
    sorted(out)
}

fn primal(e: &MatchingEquations, c: &ValidityConstraints) -> Vec<Vec<ExactInt>> {
    let rays = vertices(e, c);
    let n = e.cols();
    // The rays are already in quad coordinates, so the view is the identity.
    let enc = NormalEncoding::new(NormalCoords::Quad);
    let blocks = n / enc.block_size();
    let view = ShadowRays::new(rays.iter().map(|r| r.as_slice()), blocks, enc, enc).unwrap();
    let mut out = Vec::new();
    hilbert_primal(e, c, &view, None, |v| out.push(v)).unwrap();
    sorted(out)
}

#[test]
fn smoke_ball_basis_is_the_unit_vectors() {
    let (e, c) = setup(&one_tetrahedron(), NormalCoords::Standard);
    assert_eq!(dual(&e, &c).len(), 7);
    let (e, c) = setup(&one_tetrahedron(), NormalCoords::AlmostNormal);
    assert_eq!(dual(&e, &c).len(), 10);
    assert_eq!(cd(&e, &c).len(), 10);
}

#[test]
fn engines_agree_in_quad_coordinates() {
    let engines: [(&str, Engine); 4] =
        [("dual", dual), ("fullcone", fullcone), ("cd", cd), ("primal", primal)];
    for tri in [figure_eight(), layered_loop(1), layered_loop(2), gieseking(), twisted_kxi()] {
        let (e, c) = setup(&tri, NormalCoords::Quad);
        let want = dual(&e, &c);
        for (name, f) in engines {
            assert_eq!(f(&e, &c), want, "{name} on {tri:?}");
        }
        for v in vertices(&e, &c) {
            assert!(want.contains(&v), "vertex {v:?} missing from the basis");
        }
    }
}

#[test]
fn engines_agree_in_standard_coordinates() {
    for tri in [layered_loop(1), layered_loop(2), gieseking()] {
        let (e, c) = setup(&tri, NormalCoords::Standard);
        let want = dual(&e, &c);
        assert_eq!(fullcone(&e, &c), want);
        assert_eq!(cd(&e, &c), want, "cd on {tri:?}");
        let rays = vertices(&e, &c);
        let enc = NormalEncoding::new(NormalCoords::Standard);
        let view =
            ShadowRays::new(rays.iter().map(|r| r.as_slice()), tri.size(), enc, enc).unwrap();
        let mut got = Vec::new();
        hilbert_primal(&e, &c, &view, None, |v| got.push(v)).unwrap();
        assert_eq!(sorted(got), want);
        assert!(want.iter().all(|v| e.is_satisfied_by(v) && c.allows(v)));
    }
}

#[test]
fn basis_elements_are_irreducible() {
    let (e, c) = setup(&figure_eight(), NormalCoords::Quad);
    let basis = dual(&e, &c);
    for (i, a) in basis.iter().enumerate() {
        for (j, b) in basis.iter().enumerate() {
            if i != j {
                assert!(!dominated_by(b, a), "{b:?} ≤ {a:?}");
            }
        }
    }
}

#[test]
fn shadow_view_drops_triangles() {
    let std = NormalEncoding::new(NormalCoords::Standard);
    let quad = NormalEncoding::new(NormalCoords::Quad);
    let rays = [exact_vec(&[1, 1, 1, 1, 0, 0, 0]), exact_vec(&[0, 0, 0, 0, 0, 2, 0])];
    let view = ShadowRays::new(rays.iter().map(|r| r.as_slice()), 1, std, quad).unwrap();
    assert_eq!(view.len(), 2);
    assert_eq!(view.get(0), exact_vec(&[0, 0, 0]));
    assert_eq!(view.get(1), exact_vec(&[0, 2, 0]));

    let an = NormalEncoding::new(NormalCoords::QuadOct);
    let view = ShadowRays::new(rays.iter().map(|r| r.as_slice()), 1, std, an).unwrap();
    assert_eq!(view.get(1), exact_vec(&[0, 2, 0, 0, 0, 0]));

    assert!(ShadowRays::new(rays.iter().map(|r| r.as_slice()), 1, quad, std).is_err());
    assert!(ShadowRays::new(rays.iter().map(|r| r.as_slice()), 2, std, quad).is_err());
}

#[test]
fn primal_with_no_rays_is_empty() {
    let (e, c) = setup(&gieseking(), NormalCoords::Quad);
    let enc = NormalEncoding::new(NormalCoords::Quad);
    let view = ShadowRays::new(std::iter::empty(), 1, enc, enc).unwrap();
    let mut n = 0;
    hilbert_primal(&e, &c, &view, None, |_| n += 1).unwrap();
    assert_eq!(n, 0);
}

#[test]
fn cancelled_engines_emit_nothing() {
    let (e, c) = setup(&figure_eight(), NormalCoords::Quad);
    let tracker = ProgressTracker::new();
    tracker.cancel();
    let mut n = 0;
    assert_eq!(hilbert_dual(&e, &c, Some(&tracker), |_| n += 1), Err(Error::Cancelled));
    assert_eq!(hilbert_cd(&e, &c, Some(&tracker), |_| n += 1), Err(Error::Cancelled));
    assert_eq!(hilbert_fullcone(&e, &c, Some(&tracker), |_| n += 1), Err(Error::Cancelled));
    assert_eq!(n, 0);
}
