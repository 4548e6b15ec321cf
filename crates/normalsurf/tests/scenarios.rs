//! End-to-end enumeration scenarios on well-known manifolds, driven through
//! the public API only.

use std::sync::Arc;

use normalsurf::matching::{make_matching_equations, CuspLinkCurves};
use normalsurf::prelude::*;
use normalsurf::triangulation::random::{random_gluing, RandomCfg, ReplayToken};
use proptest::prelude::*;

fn figure_eight_from_sig() -> Triangulation {
    Triangulation::from_iso_sig("cPcbbbiht").unwrap()
}

#[test]
fn smoke_figure_eight_knot_complement() {
    let tri = figure_eight_from_sig();
    assert_eq!(tri.size(), 2);
    assert!(tri.is_ideal() && tri.is_valid());

    let quad = enumerate_vertex(&tri, NormalCoords::Quad).unwrap();
    assert_eq!(quad.len(), 4);
    assert!(quad.iter().all(|s| !s.is_compact()));

    let std = enumerate_vertex(&tri, NormalCoords::Standard).unwrap();
    assert_eq!(std.len(), 1);
    let link = std.surface(0).unwrap();
    assert!(link.is_vertex_linking());
    assert!(link.euler_char().unwrap().is_zero());
}

#[test]
fn dehydrated_figure_eight_has_only_spun_quads() {
    let tri = Triangulation::rehydrate(catalog::FIGURE_EIGHT_DEHYDRATION).unwrap();
    assert_eq!(tri.size(), 2);
    assert!(tri.is_ideal() && tri.is_valid() && tri.is_orientable());

    let quad = enumerate_vertex(&tri, NormalCoords::Quad).unwrap();
    assert_eq!(quad.len(), 4);
    for s in &quad {
        assert!(!s.is_compact(), "{s}");
        assert_eq!(s.is_thin_edge_link(), (None, None), "{s}");
    }

    let std = enumerate_vertex(&tri, NormalCoords::Standard).unwrap();
    assert_eq!(std.len(), 1);
    assert!(std.surface(0).unwrap().is_vertex_linking());
}

#[test]
fn lens_space_l81_vertex_links() {
    let tri = catalog::layered_loop(4);
    assert_eq!(tri.size(), 4);
    assert_eq!(tri.count_vertices(), 2);
    let list = enumerate_vertex(&tri, NormalCoords::Standard).unwrap();
    assert!(list.is_complete());
    assert_eq!(list.len(), 9);
    let links: Vec<&NormalSurface> = list.iter().filter(|s| s.is_vertex_linking()).collect();
    assert_eq!(links.len(), 2);
    let mut linked: Vec<usize> = links.iter().filter_map(|s| s.vertex_link()).collect();
    linked.sort();
    assert_eq!(linked, vec![0, 1]);
    for s in &links {
        assert_eq!(s.euler_char().unwrap(), ExactInt::from(2));
        assert!(s.is_sphere().unwrap());
    }
    assert_eq!(enumerate_vertex(&tri, NormalCoords::Quad).unwrap().len(), 5);
    assert_eq!(enumerate_vertex(&tri, NormalCoords::AlmostNormal).unwrap().len(), 13);
}

fn with_cusp_curves(mut tri: Triangulation) -> Triangulation {
    tri.set_peripheral_curves(Arc::new(CuspLinkCurves));
    tri
}

#[test]
fn figure_eight_has_no_closed_quad_surfaces() {
    let tri = with_cusp_curves(figure_eight_from_sig());
    let list = enumerate_vertex(&tri, NormalCoords::QuadClosed).unwrap();
    assert!(list.is_complete());
    assert!(list.is_empty());
}

#[test]
fn closed_quad_surfaces_satisfy_peripheral_functionals() {
    let tri = with_cusp_curves(catalog::by_name("cusped-4").unwrap().unwrap());
    let eqns = make_matching_equations(&tri, NormalCoords::QuadClosed).unwrap();
    let list = enumerate_vertex(&tri, NormalCoords::QuadClosed).unwrap();
    assert!(list.is_complete());
    assert_eq!(list.len(), 4);
    for s in &list {
        assert!(s.is_compact(), "{s}");
        assert!(eqns.is_satisfied_by(s.vector()), "{s}");
    }
    let spun = enumerate_vertex(&tri, NormalCoords::Quad).unwrap();
    assert_eq!(spun.len(), 12);
    assert!(spun.iter().all(|s| !eqns.is_satisfied_by(s.vector())));

    let dd = EnumerationCfg::default()
        .with_coords(NormalCoords::QuadClosed)
        .with_algorithm(NormalAlg::VERTEX_DD)
        .run(&tri)
        .unwrap();
    assert!(dd.same_surfaces(&list));

    let tracker = ProgressTracker::new();
    tracker.cancel();
    let partial = EnumerationCfg::default()
        .with_coords(NormalCoords::QuadClosed)
        .with_tracker(&tracker)
        .run(&tri)
        .unwrap();
    assert_eq!(partial.status(), EnumerationStatus::Cancelled);
    assert!(partial.iter().all(|s| eqns.is_satisfied_by(s.vector())));
}

#[test]
fn closed_quad_needs_peripheral_data() {
    let tri = figure_eight_from_sig();
    assert!(matches!(
        enumerate_vertex(&tri, NormalCoords::QuadClosed),
        Err(Error::FailedPrecondition(_))
    ));
}

#[test]
fn octagonal_sphere_in_rp3() {
    let tri = catalog::rp3_two_tet();
    let list = enumerate_vertex(&tri, NormalCoords::AlmostNormal).unwrap();
    let sphere = list
        .iter()
        .find(|s| s.oct_position().is_some() && s.is_sphere().unwrap())
        .expect("octagonal sphere");
    let normal = sphere.remove_octs().unwrap();
    assert_eq!(normal.triangulation().size(), 4);
    assert!(normal.is_sphere().unwrap());
    let eqns = make_matching_equations(normal.triangulation(), NormalCoords::Standard).unwrap();
    assert!(eqns.is_satisfied_by(normal.vector()));
}

#[test]
fn three_sphere_sweepout() {
    let tri = catalog::layered_loop(1);
    let sphere = NormalSurfaces::find_almost_normal_sphere(&tri, None).unwrap().unwrap();
    assert!(sphere.is_sphere().unwrap());
    assert_eq!(sphere.euler_char().unwrap(), ExactInt::from(2));

    let quad = enumerate_vertex(&tri, NormalCoords::Quad).unwrap();
    let meets_in_a_quad = quad.surface(0).unwrap();
    assert!(meets_in_a_quad.crush().unwrap().is_empty());
}

#[test]
fn fundamental_contains_vertex_surfaces() {
    let tri = figure_eight_from_sig();
    let which = NormalList::EMBEDDED_ONLY | NormalList::FUNDAMENTAL;
    let run = |alg| NormalSurfaces::enumerate(&tri, NormalCoords::Quad, which, alg, None).unwrap();
    let primal = run(NormalAlg::HILBERT_PRIMAL);
    let dual = run(NormalAlg::HILBERT_DUAL);
    assert!(primal.same_surfaces(&dual));
    let vertex = enumerate_vertex(&tri, NormalCoords::Quad).unwrap();
    for s in &vertex {
        assert!(dual.iter().any(|t| t == s), "{s}");
    }
}

#[test]
fn filters_compose_with_enumeration() {
    let tri = catalog::layered_loop(2);
    let list = enumerate_vertex(&tri, NormalCoords::Standard).unwrap();
    let projective_planes = list.filter(
        &FilterProperties::default()
            .with_euler([ExactInt::ONE])
            .with_orientability(BoolSet::False),
    );
    assert_eq!(projective_planes.len(), 2);
    let record = projective_planes.to_record();
    let json = serde_json::to_string_pretty(&record).unwrap();
    let back: ListRecord = serde_json::from_str(&json).unwrap();
    let restored = NormalSurfaces::from_record(&tri, &back).unwrap();
    assert!(restored.same_surfaces(&projective_planes));
    assert_eq!(restored.which(), projective_planes.which());
}

#[test]
fn seifert_fibred_space_over_rp2() {
    let tri = catalog::by_name("sfs-rp2").unwrap().unwrap();
    assert_eq!(tri.size(), 9);
    assert!(tri.is_closed() && !tri.is_orientable());
    let quad = enumerate_vertex(&tri, NormalCoords::Quad).unwrap();
    assert_eq!(quad.len(), 21);
    let std = enumerate_vertex(&tri, NormalCoords::Standard).unwrap();
    assert_eq!(std.len(), 25);
    let an = enumerate_vertex(&tri, NormalCoords::AlmostNormal).unwrap();
    assert_eq!(an.len(), 61);
    let down = std.transform(TransformKind::ConvertStandardToReduced).unwrap();
    assert!(down.same_surfaces(&quad));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn reduced_route_matches_direct_on_random_gluings(seed in any::<u64>(), n in 1usize..=3) {
        let cfg = RandomCfg { tetrahedra: n, oriented: true, ..RandomCfg::default() };
        let tri = random_gluing(cfg, ReplayToken::new(seed, 1));
        let run = |alg: NormalAlg| {
            EnumerationCfg::default()
                .with_coords(NormalCoords::Standard)
                .with_algorithm(alg)
                .run(&tri)
                .unwrap()
        };
        let via = run(NormalAlg::VERTEX_VIA_REDUCED | NormalAlg::VERTEX_TREE);
        let direct = run(NormalAlg::VERTEX_STD_DIRECT | NormalAlg::VERTEX_DD);
        prop_assert!(via.same_surfaces(&direct), "{} vs {}", via, direct);
        let eqns = make_matching_equations(&tri, NormalCoords::Standard).unwrap();
        for s in &via {
            prop_assert!(eqns.is_satisfied_by(s.vector()));
        }
    }
}
