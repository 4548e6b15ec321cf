use super::NormalSurface;
use crate::encoding::NormalCoords;
use crate::int::ExactInt;
use crate::tables::{edge_number, quad_sep};
use crate::triangulation::Triangulation;
use crate::{Error, Result};

impl NormalSurface {
    /// The link of vertex `vertex`: one triangle at every corner of it.
    pub fn vertex_link_of(tri: &Triangulation, vertex: usize) -> Result<NormalSurface> {
        let v = tri
            .vertices()
            .get(vertex)
            .ok_or_else(|| Error::invalid(format!("no vertex {vertex}")))?;
        let mut vec = vec![ExactInt::ZERO; 7 * tri.size()];
        for emb in &v.embeddings {
            vec[7 * emb.tet + emb.vertex] += 1;
        }
        let link = NormalSurface::from_coords(tri, NormalCoords::Standard, vec)?;
        Ok(link.with_name(format!("link of vertex {vertex}")))
    }

    /// The frontier of a thin regular neighbourhood of edge `edge`.
    ///
    /// One quad per embedding of the edge, plus a triangle at every corner of
    /// an endpoint that the edge does not touch in that tetrahedron.
    pub fn edge_link_of(tri: &Triangulation, edge: usize) -> Result<NormalSurface> {
        let e = tri
            .edges()
            .get(edge)
            .ok_or_else(|| Error::invalid(format!("no edge {edge}")))?;
        let mut vec = vec![ExactInt::ZERO; 7 * tri.size()];
        for emb in &e.embeddings {
            let (a, b) = (emb.perm.apply(0), emb.perm.apply(1));
            vec[7 * emb.tet + 4 + quad_sep(a, b)] += 1;
        }
        let first = e.embeddings[0];
        let mut ends = vec![
            tri.tet_vertex(first.tet, first.perm.apply(0)),
            tri.tet_vertex(first.tet, first.perm.apply(1)),
        ];
        ends.dedup();
        for end in ends {
            for emb in &tri.vertices()[end].embeddings {
                let (t, w) = (emb.tet, emb.vertex);
                let touches = (0..4).any(|x| x != w && tri.tet_edge(t, edge_number(w, x)) == edge);
                if !touches {
                    vec[7 * t + w] += 1;
                }
            }
        }
        let link = NormalSurface::from_coords(tri, NormalCoords::Standard, vec)?;
        Ok(link.with_name(format!("link of edge {edge}")))
    }
}
