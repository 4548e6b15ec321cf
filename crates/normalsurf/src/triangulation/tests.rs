use super::catalog::*;
use super::random::{random_gluing, RandomCfg, ReplayToken};
use super::*;
use crate::perm::Perm4;

#[test]
fn smoke_one_tetrahedron_skeleton() {
    let t = one_tetrahedron();
    assert_eq!(t.size(), 1);
    assert_eq!(t.count_edges(), 6);
    assert_eq!(t.count_vertices(), 4);
    assert_eq!(t.count_triangles(), 4);
    assert!(t.vertices().iter().all(|v| v.link == VertexLink::Disc));
    assert!(t.edges().iter().all(|e| e.boundary && e.degree() == 1));
    assert_eq!(t.count_boundary_components(), 1);
    assert_eq!(t.boundary_components()[0].euler, 2);
    assert!(t.is_valid() && !t.is_ideal() && t.is_orientable() && !t.is_closed());
}

#[test]
fn smoke_layered_loop_s3() {
    let t = layered_loop(1);
    assert_eq!(t.count_vertices(), 2);
    assert_eq!(t.count_edges(), 3);
    assert_eq!(t.count_triangles(), 2);
    assert!(t.vertices().iter().all(|v| v.link == VertexLink::Sphere));
    assert!(t.is_closed() && t.is_valid() && t.is_orientable());
    assert_eq!(t.euler_char_tri(), 0);
    let degrees: usize = t.edges().iter().map(Edge::degree).sum();
    assert_eq!(degrees, 6);
}

#[test]
fn layered_loops_are_closed_lens_spaces() {
    for n in 1..6 {
        let t = layered_loop(n);
        assert!(t.is_valid() && t.is_closed() && t.is_orientable(), "C({n})");
        assert_eq!(t.count_edges(), t.count_vertices() + n);
    }
    assert!(layered_loop(0).is_empty());
}

#[test]
fn figure_eight_from_isosig_matches_catalog() {
    let t = Triangulation::from_iso_sig("cPcbbbiht").unwrap();
    assert_eq!(t, figure_eight());
    assert_eq!(t.count_vertices(), 1);
    assert_eq!(t.count_edges(), 2);
    assert!(t.is_ideal() && t.is_valid() && t.is_orientable());
    let v = &t.vertices()[0];
    assert_eq!(v.link_euler, 0);
    assert!(v.link_orientable);
    assert!(t.edges().iter().all(|e| e.degree() == 6));
    assert_eq!(t.count_boundary_components(), 1);
    assert!(t.boundary_components()[0].is_ideal());
}

#[test]
fn gieseking_has_klein_bottle_cusp() {
    let t = Triangulation::rehydrate("baaaade").unwrap();
    assert_eq!(t, gieseking());
    assert!(!t.is_orientable());
    assert_eq!(t.count_vertices(), 1);
    let v = &t.vertices()[0];
    assert!(v.is_ideal());
    assert_eq!(v.link_euler, 0);
    assert!(!v.link_orientable);
}

#[test]
fn rehydrate_figure_eight_string() {
    let t = Triangulation::rehydrate("cabbbbaei").unwrap();
    assert_eq!(t.size(), 2);
    assert!(t.is_orientable() && t.is_ideal());
    assert!(!t.has_boundary_triangles());
}

#[test]
fn rehydrate_census_manifold() {
    let t = Triangulation::rehydrate(SFS_RP2_DEHYDRATION).unwrap();
    assert_eq!(t.size(), 9);
    assert!(!t.has_boundary_triangles());
    assert!(t.is_valid() && t.is_closed());
    assert!(!t.is_orientable());
    assert_eq!((t.count_vertices(), t.count_edges()), (1, 10));
    assert_eq!(t.vertices()[0].link_euler, 2);
}

#[test]
fn rehydrate_reads_high_nibble_first() {
    // "ab" and "ba" differ only in nibble order: bits 0x01 against 0x10.
    let t = Triangulation::rehydrate(FIGURE_EIGHT_DEHYDRATION).unwrap();
    assert_eq!((t.count_vertices(), t.count_edges()), (1, 2));
    assert_eq!(t.vertices()[0].link_euler, 0);
    assert!(t.is_orientable() && t.is_valid());
    assert_eq!(catalog::by_name("sfs-rp2").unwrap().map(|t| t.size()), Some(9));
    assert!(catalog::by_name("no-such-entry").unwrap().is_none());
}

#[test]
fn bad_strings_are_rejected() {
    assert!(Triangulation::from_iso_sig("c?cbbbiht").is_err());
    assert!(Triangulation::from_iso_sig("cPcbbbih").is_err());
    assert!(Triangulation::from_iso_sig("cPc bbbiht").is_err());
    assert!(Triangulation::rehydrate("baaaad").is_err());
    assert!(Triangulation::rehydrate("bAaaa!e").is_err());
    assert!(Triangulation::from_iso_sig("a").unwrap().is_empty());
    assert!(Triangulation::rehydrate("a").unwrap().is_empty());
}

#[test]
fn twisted_kxi_boundary_is_a_torus() {
    let t = twisted_kxi();
    let bdry: Vec<_> = t.triangles().iter().filter(|f| f.is_boundary()).collect();
    assert_eq!(bdry.len(), 2);
    assert_eq!(t.count_boundary_components(), 1);
    assert_eq!(t.boundary_components()[0].euler, 0);
    assert!(!t.is_orientable());
}

#[test]
fn join_rejects_double_gluing_and_snapshots_are_frozen() {
    let mut t = Triangulation::with_size(2);
    t.join(0, 0, 1, Perm4::IDENTITY).unwrap();
    let snap = t.snapshot();
    assert!(t.shares_snapshot(&snap));
    assert!(t.join(0, 0, 1, Perm4::new(1, 0, 2, 3)).is_err());
    assert!(t.join(1, 2, 1, Perm4::IDENTITY).is_err());
    t.join(0, 1, 1, Perm4::new(0, 2, 1, 3)).unwrap();
    assert!(!t.shares_snapshot(&snap));
    assert_eq!(snap.adjacent(0, 1), None);
    assert_eq!(t.adjacent(1, 2), Some((0, Perm4::new(0, 2, 1, 3))));
    assert_eq!(snap.count_triangles(), 7);
    assert_eq!(t.count_triangles(), 6);
}

#[test]
fn components_split_and_remove_reindexes() {
    let mut t = figure_eight();
    let off = t.insert_triangulation(&one_tetrahedron());
    assert_eq!(off, 2);
    assert_eq!(t.count_components(), 2);
    let parts = t.triangulate_components();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], figure_eight());
    assert_eq!(parts[1].size(), 1);

    let mut u = t.clone();
    u.remove_tetrahedron(0);
    assert_eq!(u.size(), 2);
    assert!(u.tetrahedra().iter().all(|tet| tet.adj.iter().flatten().all(|&(d, _)| d < 2)));
}

#[test]
fn random_gluings_replay_and_orient() {
    let cfg = RandomCfg {
        tetrahedra: 4,
        oriented: true,
        ..RandomCfg::default()
    };
    let a = random_gluing(cfg, ReplayToken::new(7, 3));
    let b = random_gluing(cfg, ReplayToken::new(7, 3));
    assert_eq!(a, b);
    assert!(a.is_connected());
    assert!(a.is_oriented());
    assert!(!a.has_boundary_triangles());
}
