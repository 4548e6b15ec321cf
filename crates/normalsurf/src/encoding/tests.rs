use super::*;
use crate::int::exact_vec;
use crate::triangulation::catalog::{figure_eight, layered_loop, one_tetrahedron};

#[test]
fn smoke_block_sizes_per_system() {
    let sizes: Vec<usize> = NormalCoords::ALL
        .iter()
        .map(|&c| NormalEncoding::new(c).block_size())
        .collect();
    assert_eq!(sizes, vec![7, 3, 3, 10, 6, 6]);
    let std = NormalEncoding::new(NormalCoords::Standard);
    assert!(std.stores_triangles() && !std.stores_octagons() && !std.could_be_non_compact());
    let quad = NormalEncoding::new(NormalCoords::Quad);
    assert!(!quad.stores_triangles() && quad.could_be_non_compact());
    assert!(!NormalEncoding::new(NormalCoords::QuadOctClosed).could_be_non_compact());
    assert_eq!(NormalEncoding::new(NormalCoords::AlmostNormal).oct_offset(), 7);
    assert_eq!(NormalEncoding::new(NormalCoords::QuadOct).oct_offset(), 3);
}

#[test]
fn derived_encodings_and_union() {
    let quad = NormalEncoding::new(NormalCoords::Quad);
    assert_eq!(quad.with_triangles().block_size(), 7);
    assert_eq!(quad.with_octagons().block_size(), 6);
    let an = NormalEncoding::new(NormalCoords::AlmostNormal);
    assert_eq!(an.without_octagons().block_size(), 7);
    assert!(!an.without_octagons().stores_octagons());

    let std = NormalEncoding::new(NormalCoords::Standard);
    let qo = NormalEncoding::new(NormalCoords::QuadOct);
    let u = std.union(qo);
    assert_eq!(u.block_size(), 10);
    assert!(u.stores_triangles() && u.stores_octagons() && u.could_be_non_compact());
    assert_eq!(NormalEncoding::empty().union(std), std);
    assert_eq!(std.union(NormalEncoding::empty()), std);
}

#[test]
fn tags_round_trip() {
    for c in NormalCoords::ALL {
        assert_eq!(NormalCoords::from_tag(c.tag()).unwrap(), c);
        let e = NormalEncoding::new(c);
        assert_eq!(NormalEncoding::from_int_value(e.int_value()).unwrap(), e);
    }
    assert!(NormalCoords::from_tag(7).is_err());
    // Size nibble disagrees with the stored kinds.
    assert!(NormalEncoding::from_int_value(0x10 | 3).is_err());
    assert!(NormalEncoding::from_int_value(0x1000 | 3).is_err());
    assert_eq!(NormalCoords::from_short_name("AN"), Some(NormalCoords::AlmostNormal));
    assert_eq!(NormalCoords::from_short_name("hex"), None);
}

#[test]
fn reconstruct_single_quad_in_a_ball() {
    let tri = one_tetrahedron();
    let mut v = exact_vec(&[1, 0, 0]);
    let enc = NormalEncoding::new(NormalCoords::Quad)
        .reconstruct_triangles(&tri, &mut v)
        .unwrap();
    assert!(enc.stores_triangles());
    assert_eq!(v, exact_vec(&[0, 0, 0, 0, 1, 0, 0]));
}

#[test]
fn reconstruct_edge_linking_torus_in_s3() {
    let tri = layered_loop(1);
    let mut v = exact_vec(&[1, 0, 0]);
    NormalEncoding::new(NormalCoords::Quad)
        .reconstruct_triangles(&tri, &mut v)
        .unwrap();
    assert_eq!(v, exact_vec(&[0, 0, 0, 0, 1, 0, 0]));
}

#[test]
fn reconstruct_rejects_spun_vectors_and_bad_lengths() {
    let tri = figure_eight();
    let mut v = exact_vec(&[0, 1, 0, 2, 0, 0]);
    let before = v.clone();
    let err = NormalEncoding::new(NormalCoords::Quad).reconstruct_triangles(&tri, &mut v);
    assert!(matches!(err, Err(Error::InvalidArgument(_))));
    assert_eq!(v, before);

    let mut short = exact_vec(&[1, 0]);
    assert!(NormalEncoding::new(NormalCoords::Quad)
        .reconstruct_triangles(&one_tetrahedron(), &mut short)
        .is_err());
}
