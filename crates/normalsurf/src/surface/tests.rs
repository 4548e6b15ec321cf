use super::*;
use crate::int::exact_vec;
use crate::list::enumerate_vertex;
use crate::matching::make_matching_equations;
use crate::triangulation::catalog::*;
use crate::Error;

fn std_surface(tri: &Triangulation, v: &[i64]) -> NormalSurface {
    NormalSurface::from_coords(tri, NormalCoords::Standard, exact_vec(v)).unwrap()
}

#[test]
fn smoke_vertex_links_are_spheres() {
    for tri in [layered_loop(1), layered_loop(2), layered_loop(3)] {
        let eqns = make_matching_equations(&tri, NormalCoords::Standard).unwrap();
        for v in 0..tri.count_vertices() {
            let s = NormalSurface::vertex_link_of(&tri, v).unwrap();
            assert!(eqns.is_satisfied_by(s.vector()));
            assert!(s.is_vertex_linking());
            assert_eq!(s.vertex_link(), Some(v));
            assert_eq!(s.euler_char().unwrap(), ExactInt::from(2));
            assert!(s.is_sphere().unwrap());
            assert!(s.is_orientable().unwrap() && s.is_two_sided().unwrap());
            assert_eq!(s.count_components().unwrap(), 1);
            assert!(!s.has_real_boundary());
        }
    }
}

#[test]
fn cusp_link_is_a_torus() {
    let tri = figure_eight();
    let s = NormalSurface::vertex_link_of(&tri, 0).unwrap();
    assert!(s.is_compact());
    assert!(!s.has_real_boundary());
    assert!(s.euler_char().unwrap().is_zero());
    assert!(s.is_torus().unwrap());
    assert!(!s.is_sphere().unwrap());
    assert!(NormalSurface::vertex_link_of(&tri, 7).is_err());
}

#[test]
fn smoke_discs_in_a_ball() {
    let tri = one_tetrahedron();
    let tri_disc = std_surface(&tri, &[1, 0, 0, 0, 0, 0, 0]);
    let quad_disc = std_surface(&tri, &[0, 0, 0, 0, 1, 0, 0]);
    for s in [&tri_disc, &quad_disc] {
        assert!(s.has_real_boundary());
        assert_eq!(s.euler_char().unwrap(), ExactInt::ONE);
        assert!(s.is_disc().unwrap());
        assert_eq!(s.count_boundaries().unwrap(), 1);
        assert_eq!(s.is_central(), 1);
    }
    assert_eq!(tri_disc.edge_weight(0).unwrap(), Some(ExactInt::ONE));
    assert_eq!(tri_disc.edge_weight(5).unwrap(), Some(ExactInt::ZERO));
    assert!(quad_disc.is_splitting());
    assert!(!tri_disc.is_splitting());
}

#[test]
fn out_of_range_queries_are_rejected() {
    let tri = one_tetrahedron();
    let disc = std_surface(&tri, &[1, 0, 0, 0, 0, 0, 0]);
    assert!(matches!(disc.edge_weight(6), Err(Error::InvalidArgument(_))));
    assert!(matches!(disc.arcs(4, 0), Err(Error::InvalidArgument(_))));
    assert!(matches!(disc.arcs(0, 3), Err(Error::InvalidArgument(_))));
    let corners: Vec<_> = (0..3).map(|v| disc.arcs(0, v).unwrap()).collect();
    assert!(corners.iter().all(Option::is_some));

    let fig8 = figure_eight();
    let spun =
        NormalSurface::from_coords(&fig8, NormalCoords::Quad, exact_vec(&[0, 1, 0, 2, 0, 0]))
            .unwrap();
    assert_eq!(spun.edge_weight(0).unwrap(), None);
    assert!(spun.edge_weight(2).is_err());
}

#[test]
fn equality_ignores_encoding() {
    let tri = one_tetrahedron();
    let reduced =
        NormalSurface::from_coords(&tri, NormalCoords::Quad, exact_vec(&[1, 0, 0])).unwrap();
    let full = std_surface(&tri, &[0, 0, 0, 0, 1, 0, 0]);
    assert_eq!(reduced, full);
    assert_eq!(reduced.triangles(0, 2), Some(ExactInt::ZERO));
    assert_eq!(reduced.vector_in(full.encoding()).unwrap(), full.vector());
    let other = std_surface(&tri, &[0, 0, 0, 0, 0, 1, 0]);
    assert!(full > other);
    assert!(NormalSurface::from_coords(&tri, NormalCoords::Quad, exact_vec(&[1, 0])).is_err());
}

#[test]
fn octagon_queries() {
    let tri = one_tetrahedron();
    let oct = exact_vec(&[0, 0, 0, 0, 0, 0, 0, 0, 1, 0]);
    let one = NormalSurface::from_coords(&tri, NormalCoords::AlmostNormal, oct).unwrap();
    assert_eq!(one.oct_position(), Some(DiscType { tet: 0, kind: 1 }));
    assert!(!one.has_multiple_oct_discs());
    assert!(one.double().has_multiple_oct_discs());
    assert!(matches!(
        one.vector_in(NormalEncoding::new(NormalCoords::Standard)),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(one.crush(), Err(Error::InvalidArgument(_))));
    assert_eq!(one.octs(0, 1), ExactInt::ONE);
    assert_eq!(std_surface(&tri, &[0; 7]).octs(0, 1), ExactInt::ZERO);
}

#[test]
fn sums_and_disjointness() {
    let tri = one_tetrahedron();
    let a = std_surface(&tri, &[1, 0, 0, 0, 0, 0, 0]);
    let quad = std_surface(&tri, &[0, 0, 0, 0, 1, 0, 0]);
    let other_quad = std_surface(&tri, &[0, 0, 0, 0, 0, 1, 0]);

    let sum = (&a + &quad).unwrap();
    assert_eq!(sum.vector(), exact_vec(&[1, 0, 0, 0, 1, 0, 0]).as_slice());
    assert!(sum.is_embedded());
    assert_eq!(sum.count_components().unwrap(), 2);
    let mut parts = sum.components().unwrap();
    parts.sort();
    let mut want = vec![a.clone(), quad.clone()];
    want.sort();
    assert_eq!(parts, want);

    assert!(a.disjoint(&quad).unwrap());
    assert!(!quad.locally_compatible(&other_quad));
    assert!(!quad.disjoint(&other_quad).unwrap());
    assert!(!(&quad + &other_quad).unwrap().is_embedded());
}

#[test]
fn scaling() {
    let tri = layered_loop(2);
    let link = NormalSurface::vertex_link_of(&tri, 0).unwrap();
    let mut triple = &link * 3;
    assert_eq!(triple.count_components().unwrap(), 3);
    assert_eq!(triple.euler_char().unwrap(), ExactInt::from(6));
    assert_eq!(triple.scale_down(), ExactInt::from(3));
    assert_eq!(triple, link);
    assert_eq!(triple.scale_down(), ExactInt::ONE);
    assert_eq!(triple.euler_char().unwrap(), ExactInt::from(2));
}

#[test]
fn vertex_links_are_disjoint_from_everything() {
    let tri = layered_loop(2);
    let link = NormalSurface::vertex_link_of(&tri, 0).unwrap();
    for s in enumerate_vertex(&tri, NormalCoords::Standard).unwrap().iter() {
        if s.is_connected().unwrap() && s != &link {
            assert!(link.disjoint(s).unwrap(), "{s}");
        }
    }
}

#[test]
fn edge_links_are_recognised() {
    for tri in [layered_loop(3), figure_eight()] {
        for e in 0..tri.count_edges() {
            let s = NormalSurface::edge_link_of(&tri, e).unwrap();
            let (a, b) = s.is_thin_edge_link();
            assert!(a == Some(e) || b == Some(e), "edge {e}");
            assert!(!s.is_vertex_linking());
        }
    }
    assert!(NormalSurface::edge_link_of(&one_tetrahedron(), 6).is_err());
}

#[test]
fn spun_surfaces_have_no_finite_counts() {
    let list = enumerate_vertex(&figure_eight(), NormalCoords::Quad).unwrap();
    assert_eq!(list.len(), 4);
    for s in list.iter() {
        assert!(!s.is_compact());
        assert_eq!(s.triangles(0, 0), None);
        assert!(matches!(s.euler_char(), Err(Error::FailedPrecondition(_))));
        assert!(!s.is_sphere().unwrap());
        assert!(s.is_orientable().is_err());
    }
}

#[test]
fn smoke_crush() {
    let s3 = layered_loop(1);
    let quad = NormalSurface::from_coords(&s3, NormalCoords::Quad, exact_vec(&[0, 0, 1])).unwrap();
    assert!(quad.crush().unwrap().is_empty());

    let rp3 = layered_loop(2);
    let link = NormalSurface::vertex_link_of(&rp3, 0).unwrap();
    assert_eq!(link.crush().unwrap(), rp3);
}

#[test]
fn removing_octagons_leaves_a_normal_sphere() {
    let tri = rp3_two_tet();
    let list = enumerate_vertex(&tri, NormalCoords::AlmostNormal).unwrap();
    let oct = list
        .iter()
        .find(|s| s.oct_position().is_some() && s.is_sphere().unwrap())
        .expect("octagonal sphere");
    let normal = oct.remove_octs().unwrap();
    assert_eq!(normal.triangulation().size(), 4);
    assert_eq!(normal.encoding(), NormalEncoding::new(NormalCoords::Standard));
    let eqns = make_matching_equations(normal.triangulation(), NormalCoords::Standard).unwrap();
    assert!(eqns.is_satisfied_by(normal.vector()));
    assert_eq!(normal.euler_char().unwrap(), ExactInt::from(2));
    assert!(normal.is_sphere().unwrap());

    let link = NormalSurface::vertex_link_of(&tri, 0).unwrap();
    assert_eq!(link.remove_octs().unwrap(), link);
}

#[test]
fn cutting_a_ball_along_a_disc() {
    let tri = one_tetrahedron();
    for v in [[1, 0, 0, 0, 0, 0, 0], [0, 0, 0, 0, 0, 0, 1]] {
        let disc = std_surface(&tri, &v);
        let cut = disc.cut_along().unwrap();
        assert!(cut.is_valid());
        assert_eq!(cut.count_components(), 2);
        assert_eq!(cut.count_boundary_components(), 2);
        assert!(!disc.is_compressing_disc(false).unwrap());
    }
    let cut = std_surface(&tri, &[0; 7]).cut_along().unwrap();
    assert!(cut.is_connected());
    assert_eq!(cut.count_boundary_components(), 1);
}

#[test]
fn cutting_along_a_vertex_link() {
    let tri = layered_loop(1);
    let link = NormalSurface::vertex_link_of(&tri, 0).unwrap();
    let cut = link.cut_along().unwrap();
    assert!(cut.is_valid());
    assert_eq!(cut.count_components(), 2);
    assert!(cut.boundary_components().iter().all(|bc| bc.euler == 2));
    assert_eq!(cut.count_boundary_components(), 2);
}

#[test]
fn smoke_compressing_discs() {
    assert!(lst_123().has_simple_compressing_disc());
    assert!(lst_123().has_compressing_disc().unwrap());
    assert!(!one_tetrahedron().has_simple_compressing_disc());
    assert!(!one_tetrahedron().has_compressing_disc().unwrap());
    assert!(!layered_loop(1).has_compressing_disc().unwrap());
}
