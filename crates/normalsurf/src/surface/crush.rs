use super::NormalSurface;
use crate::perm::Perm4;
use crate::tables::QUAD_PARTNER;
use crate::triangulation::Triangulation;
use crate::{Error, Result};

impl NormalSurface {
    /// Crush this surface to a point.
    ///
    /// Every tetrahedron holding a quad is flattened along it and
    /// disappears; faces on either side of a flattened block are glued
    /// straight through. The surface must have no octagons. The result may
    /// change topology (it can lose or split components) and is returned as
    /// a fresh triangulation; `self` is untouched.
    pub fn crush(&self) -> Result<Triangulation> {
        if self.oct_position().is_some() {
            return Err(Error::invalid("cannot crush a surface with octagons"));
        }
        let tri = self.triangulation();
        let n = tri.size();
        let quad_type: Vec<Option<usize>> = (0..n)
            .map(|t| (0..3).find(|&q| !self.quads(t, q).is_zero()))
            .collect();
        let mut index = vec![usize::MAX; n];
        let mut kept = 0;
        for t in 0..n {
            if quad_type[t].is_none() {
                index[t] = kept;
                kept += 1;
            }
        }
        let mut out = Triangulation::with_size(kept);

        for t in (0..n).filter(|&t| quad_type[t].is_none()) {
            for f in 0..4 {
                let Some((u, g)) = tri.adjacent(t, f) else {
                    continue;
                };
                let Some((dest, perm)) = walk_through(tri, &quad_type, f, u, g)? else {
                    continue;
                };
                let dest_face = perm.apply(f);
                // Each gluing is seen from both sides; add it once.
                if (dest, dest_face) <= (t, f) {
                    continue;
                }
                out.join(index[t], f, index[dest], perm)?;
            }
        }
        tracing::debug!(before = n, after = kept, "crushed surface");
        Ok(out)
    }
}

/// Follow face `f` through the flattened tetrahedra starting at `(u, g)`.
/// Returns the first unflattened tetrahedron and the composite gluing, or
/// `None` if the walk runs into the boundary.
fn walk_through(
    tri: &Triangulation,
    quad_type: &[Option<usize>],
    f: usize,
    mut adj: usize,
    mut perm: Perm4,
) -> Result<Option<(usize, Perm4)>> {
    let mut face = perm.apply(f);
    let mut steps = 0;
    while let Some(q) = quad_type[adj] {
        // A flattened tetrahedron identifies each face with the face across
        // its quad.
        let swap = Perm4::transposition(face, QUAD_PARTNER[q][face]);
        face = swap.apply(face);
        let Some((next, g)) = tri.adjacent(adj, face) else {
            return Ok(None);
        };
        perm = g * swap * perm;
        adj = next;
        face = perm.apply(f);
        steps += 1;
        if steps > 4 * tri.size() {
            return Err(Error::unsolved("crushing walk does not terminate"));
        }
    }
    Ok(Some((adj, perm)))
}
