//! Compressing discs.
//!
//! A properly embedded disc is compressing when its boundary curve does not
//! bound a disc in the boundary of the manifold. Cutting along the disc and
//! counting boundary components tells the two cases apart: a trivial curve
//! always splits off a new 2-sphere.

use super::NormalSurface;
use crate::encoding::NormalCoords;
use crate::int::ExactInt;
use crate::list::enumerate_vertex;
use crate::perm::Perm4;
use crate::tables::{edge_number, EDGE_VERTEX};
use crate::triangulation::Triangulation;
use crate::Result;

fn sphere_boundaries(tri: &Triangulation) -> usize {
    tri.boundary_components().iter().filter(|bc| bc.euler == 2).count()
}

/// Whether cutting `before` along a disc, giving `after`, compressed the
/// boundary rather than splitting off a sphere.
fn compressed(before: &Triangulation, after: &Triangulation) -> bool {
    if after.count_boundary_components() == before.count_boundary_components() {
        // The curve did not separate its boundary component.
        return true;
    }
    sphere_boundaries(after) == sphere_boundaries(before)
}

impl NormalSurface {
    /// Whether this surface is a compressing disc.
    ///
    /// Pass `known_connected` to skip the connectivity walk when the caller
    /// already knows the answer (vertex surfaces, for instance).
    pub fn is_compressing_disc(&self, known_connected: bool) -> Result<bool> {
        if !self.is_compact() || !self.has_real_boundary() {
            return Ok(false);
        }
        if self.euler_char()? != ExactInt::ONE {
            return Ok(false);
        }
        if !known_connected && !self.is_connected()? {
            return Ok(false);
        }
        let cut = self.cut_along()?;
        Ok(compressed(self.triangulation(), &cut))
    }
}

impl Triangulation {
    fn admits_disc_search(&self) -> bool {
        self.has_boundary_triangles() && self.is_valid() && !self.is_ideal()
    }

    /// Look for a compressing disc made of a single internal triangle or
    /// hiding in a small configuration. Cheap but incomplete: `false` does
    /// not mean the boundary is incompressible.
    pub fn has_simple_compressing_disc(&self) -> bool {
        if !self.admits_disc_search() {
            return false;
        }
        // A valid one-tetrahedron component with three triangles and one
        // vertex is the layered solid torus LST(1,2,3).
        if self
            .triangulate_components()
            .iter()
            .any(|c| c.size() == 1 && c.count_triangles() == 3 && c.count_vertices() == 1)
        {
            return true;
        }

        let sk = self.skeleton();
        for (i, tri) in self.triangles().iter().enumerate() {
            if tri.is_boundary() {
                continue;
            }
            if !sk.triangle_edges(i).iter().all(|&e| self.edges()[e].boundary) {
                continue;
            }
            let front = tri.front();
            let mut cut = self.clone();
            cut.unjoin(front.tet, front.face());
            if compressed(self, &cut) {
                tracing::debug!(triangle = i, "compressing triangle");
                return true;
            }
        }

        // Snapped balls: a tetrahedron with faces i and j folded together.
        // The disc spanning the equator edge ij is compressing when it
        // separates the two outer faces in an essential way.
        for t in 0..self.size() {
            for i in 0..3 {
                for j in i + 1..4 {
                    let fold = Perm4::transposition(i, j);
                    if self.adjacent(t, i) != Some((t, fold)) {
                        continue;
                    }
                    let equator = self.tet_edge(t, edge_number(i, j));
                    if !self.edges()[equator].boundary {
                        continue;
                    }
                    let hinge = 5 - edge_number(i, j);
                    let upper = EDGE_VERTEX[hinge][0];
                    let mut cut = self.clone();
                    let Some((adj, g)) = cut.unjoin(t, upper) else {
                        continue;
                    };
                    let half = cut.new_tetrahedron();
                    if cut.join(half, i, half, fold).is_err()
                        || cut.join(half, upper, adj, g).is_err()
                    {
                        continue;
                    }
                    if compressed(self, &cut) {
                        tracing::debug!(tet = t, "compressing disc in a snapped ball");
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Whether the real boundary is compressible.
    ///
    /// Needs a valid triangulation without ideal vertices; returns `false`
    /// otherwise. Runs a standard vertex enumeration unless a simple disc
    /// turns up first, so it can be slow.
    pub fn has_compressing_disc(&self) -> Result<bool> {
        if !self.admits_disc_search() {
            return Ok(false);
        }
        if self.boundary_components().iter().all(|bc| bc.euler == 2) {
            return Ok(false);
        }
        if self.has_simple_compressing_disc() {
            return Ok(true);
        }
        let list = enumerate_vertex(self, NormalCoords::Standard)?;
        for s in list.iter() {
            // Vertex surfaces are connected.
            if s.is_compressing_disc(true)? {
                tracing::debug!(surface = %s, "compressing disc among vertex surfaces");
                return Ok(true);
            }
        }
        Ok(false)
    }
}
