//! Small named triangulations used in tests, benches and the CLI.
//!
//! Constructors are explicit gluing tables so tests can rely on exact
//! tetrahedron and vertex labellings.

use super::Triangulation;
use crate::perm::Perm4;
use crate::Result;

/// A single tetrahedron with all four faces on the boundary (a 3-ball).
pub fn one_tetrahedron() -> Triangulation {
    Triangulation::with_size(1)
}

/// The untwisted layered loop C(n): S³ for n = 1, RP³ for n = 2 and the lens
/// space L(2n, 1) in general. One edge lies in every tetrahedron.
///
/// `n == 0` gives the empty triangulation.
pub fn layered_loop(n: usize) -> Triangulation {
    let mut gluings = Vec::with_capacity(2 * n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        gluings.push((i, 0, prev, Perm4::new(1, 0, 2, 3)));
        gluings.push((i, 3, prev, Perm4::new(0, 1, 3, 2)));
    }
    Triangulation::from_table(n, &gluings)
}

/// The two-tetrahedron ideal triangulation of the figure-eight knot
/// complement (isomorphism signature `cPcbbbiht`).
pub fn figure_eight() -> Triangulation {
    Triangulation::from_table(
        2,
        &[
            (0, 0, 1, Perm4::IDENTITY),
            (0, 1, 1, Perm4::new(1, 2, 0, 3)),
            (0, 2, 1, Perm4::new(1, 0, 3, 2)),
            (0, 3, 1, Perm4::new(3, 0, 2, 1)),
        ],
    )
}

/// The one-tetrahedron Gieseking manifold (dehydration `baaaade`):
/// non-orientable with a single Klein bottle cusp.
pub fn gieseking() -> Triangulation {
    Triangulation::from_table(
        1,
        &[(0, 0, 0, Perm4::new(1, 3, 2, 0)), (0, 2, 0, Perm4::new(2, 1, 3, 0))],
    )
}

/// A three-tetrahedron triangulation of the twisted I-bundle over the Klein
/// bottle, with two boundary triangles.
pub fn twisted_kxi() -> Triangulation {
    Triangulation::from_table(
        3,
        &[
            (0, 0, 1, Perm4::IDENTITY),
            (0, 1, 2, Perm4::new(2, 1, 0, 3)),
            (0, 2, 2, Perm4::new(1, 3, 2, 0)),
            (1, 1, 2, Perm4::new(0, 3, 2, 1)),
            (1, 2, 2, Perm4::new(3, 1, 0, 2)),
        ],
    )
}

/// A two-tetrahedron triangulation of RP³ that is not a layered loop. Its
/// almost normal enumeration contains an octagonal 2-sphere in tetrahedron 1.
pub fn rp3_two_tet() -> Triangulation {
    Triangulation::from_table(
        2,
        &[
            (0, 0, 1, Perm4::new(0, 2, 1, 3)),
            (0, 3, 0, Perm4::new(1, 3, 0, 2)),
            (1, 1, 1, Perm4::new(0, 2, 1, 3)),
            (1, 3, 0, Perm4::new(2, 0, 3, 1)),
        ],
    )
}

/// The one-tetrahedron layered solid torus LST(1,2,3): face 0 is folded
/// onto face 3, leaving a one-vertex torus on the boundary.
pub fn lst_123() -> Triangulation {
    Triangulation::from_table(1, &[(0, 0, 0, Perm4::new(3, 0, 1, 2))])
}

/// Dehydration of a nine-tetrahedron Seifert fibred space over RP² with
/// three exceptional fibres of type (2,1).
pub const SFS_RP2_DEHYDRATION: &str = "jnnafaabcfighhihimgbpqpepbr";

/// Dehydration of a two-tetrahedron ideal triangulation of the figure-eight
/// knot complement, labelled differently from [`figure_eight`].
pub const FIGURE_EIGHT_DEHYDRATION: &str = "cabbbbteh";

/// Dehydration of a four-tetrahedron orientable census manifold with one
/// torus cusp. Unlike the figure-eight it carries closed normal surfaces.
pub const CUSPED_FOUR_TET_DEHYDRATION: &str = "ebdbcdddaqhie";

/// Look up a catalog entry by name (as used on the command line).
///
/// `Ok(None)` means the name is not in the catalog; an error means a stored
/// entry failed to decode.
pub fn by_name(name: &str) -> Result<Option<Triangulation>> {
    let lower = name.to_ascii_lowercase();
    if let Some(n) = lower.strip_prefix("loop").and_then(|s| s.parse().ok()) {
        return Ok(Some(layered_loop(n)));
    }
    let tri = match lower.as_str() {
        "ball" | "one-tet" => one_tetrahedron(),
        "s3" => layered_loop(1),
        "rp3" => layered_loop(2),
        "rp3-2" => rp3_two_tet(),
        "lst" => lst_123(),
        "figure-eight" | "fig8" => figure_eight(),
        "gieseking" => gieseking(),
        "twisted-kxi" => twisted_kxi(),
        "sfs-rp2" => Triangulation::rehydrate(SFS_RP2_DEHYDRATION)?,
        "cusped-4" => Triangulation::rehydrate(CUSPED_FOUR_TET_DEHYDRATION)?,
        _ => return Ok(None),
    };
    Ok(Some(tri))
}
