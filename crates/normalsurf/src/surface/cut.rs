//! Cutting a triangulation along a normal surface.
//!
//! The discs split each tetrahedron into regions, and each region is a ball
//! bounded by polygons: pieces of the tetrahedron's faces and one side of
//! each disc it touches. Every polygon is coned from its own centre and
//! every region from its centre, giving one new tetrahedron
//! `(region centre, polygon centre, p_k, p_k+1)` per polygon edge. Face
//! pieces are glued across the original face gluings; disc sides stay
//! unglued and become the new boundary.

use std::collections::BTreeMap;

use super::{NormalSurface, WIDE};
use crate::cfg::MAX_DISC_WALK;
use crate::dsu::ParityDsu;
use crate::int::ExactInt;
use crate::perm::Perm4;
use crate::tables::{edge_number, face_vertices, quad_sep, EDGE_VERTEX, QUAD_DEFN, QUAD_PARTNER};
use crate::triangulation::Triangulation;
use crate::{Error, Result};

/// A polygon vertex inside one tetrahedron: a corner, or the `pos`-th
/// intersection point on a local edge counted from its lower endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PVert {
    Corner(usize),
    Point(usize, usize),
}

/// Disc counts of one tetrahedron.
struct Counts {
    tris: [usize; 4],
    /// Quad type and number of quads.
    quad: Option<(usize, usize)>,
}

impl Counts {
    fn new(block: &[ExactInt]) -> Result<Counts> {
        let count = |x: &ExactInt| -> Result<usize> {
            x.to_i64()
                .and_then(|v| usize::try_from(v).ok())
                .ok_or_else(|| Error::unsolved("disc count out of range"))
        };
        let mut tris = [0; 4];
        for (v, slot) in tris.iter_mut().enumerate() {
            *slot = count(&block[v])?;
        }
        let quad = match (0..3).find(|&q| !block[4 + q].is_zero()) {
            Some(q) => Some((q, count(&block[4 + q])?)),
            None => None,
        };
        Ok(Counts { tris, quad })
    }

    fn weight(&self, x: usize, y: usize) -> usize {
        let crossing = match self.quad {
            Some((q, n)) if QUAD_PARTNER[q][x] != y => n,
            _ => 0,
        };
        self.tris[x] + self.tris[y] + crossing
    }

    /// Arcs around corner `v` of face `f`.
    fn corner(&self, v: usize, f: usize) -> usize {
        match self.quad {
            Some((q, n)) if q == quad_sep(v, f) => self.tris[v] + n,
            _ => self.tris[v],
        }
    }

    /// The `p`-th point from `from` on the edge towards `to`.
    fn point(&self, from: usize, to: usize, p: usize) -> PVert {
        let pos = if from < to { p } else { self.weight(from, to) - 1 - p };
        PVert::Point(edge_number(from, to), pos)
    }

    /// Local edge and gap index of the `j`-th gap from `from` towards `to`.
    fn gap(&self, from: usize, to: usize, j: usize) -> (usize, usize) {
        let idx = if from < to { j } else { self.weight(from, to) - j };
        (edge_number(from, to), idx)
    }

    /// Image of `v` under the face gluing `g`.
    fn map(&self, g: Perm4, v: PVert) -> PVert {
        match v {
            PVert::Corner(x) => PVert::Corner(g.apply(x)),
            PVert::Point(e, pos) => {
                let [x, y] = EDGE_VERTEX[e];
                let (gx, gy) = (g.apply(x), g.apply(y));
                let pos = if gx < gy { pos } else { self.weight(x, y) - 1 - pos };
                PVert::Point(edge_number(gx, gy), pos)
            }
        }
    }
}

struct Polygon {
    region: usize,
    verts: Vec<PVert>,
    /// `(tet, face)` for a face piece; `None` for one side of a disc.
    face: Option<(usize, usize)>,
}

/// Face pieces and disc sides of tetrahedron `t`, with regions numbered
/// from `first_region`. Returns the number of regions.
fn split_tetrahedron(t: usize, c: &Counts, first_region: usize, out: &mut Vec<Polygon>) -> usize {
    let mut gap_base = [0usize; 6];
    let mut gaps = 0;
    for (e, base) in gap_base.iter_mut().enumerate() {
        *base = gaps;
        gaps += c.weight(EDGE_VERTEX[e][0], EDGE_VERTEX[e][1]) + 1;
    }
    let gap_id = |from: usize, to: usize, j: usize| -> usize {
        let (e, g) = c.gap(from, to, j);
        gap_base[e] + g
    };

    // (face, vertices, gaps touched)
    let mut pieces: Vec<(usize, Vec<PVert>, Vec<usize>)> = Vec::new();
    for f in 0..4 {
        let [x, y, z] = face_vertices(f);
        let around = [(x, y, z), (y, z, x), (z, x, y)];
        let mut centre = Vec::with_capacity(6);
        let mut centre_gaps = Vec::with_capacity(3);
        for (v, next, prev) in around {
            let n = c.corner(v, f);
            if n > 0 {
                pieces.push((
                    f,
                    vec![PVert::Corner(v), c.point(v, next, 0), c.point(v, prev, 0)],
                    vec![gap_id(v, next, 0), gap_id(v, prev, 0)],
                ));
            }
            for j in 1..n {
                pieces.push((
                    f,
                    vec![
                        c.point(v, next, j - 1),
                        c.point(v, next, j),
                        c.point(v, prev, j),
                        c.point(v, prev, j - 1),
                    ],
                    vec![gap_id(v, next, j), gap_id(v, prev, j)],
                ));
            }
            if n == 0 {
                centre.push(PVert::Corner(v));
            } else {
                centre.push(c.point(v, prev, n - 1));
                centre.push(c.point(v, next, n - 1));
            }
            centre_gaps.push(gap_id(v, next, n));
        }
        pieces.push((f, centre, centre_gaps));
    }

    let mut dsu = ParityDsu::new(gaps);
    for (_, _, touched) in &pieces {
        for &g in &touched[1..] {
            dsu.union(touched[0], g, false);
        }
    }
    let (labels, regions) = dsu.labels();

    for (f, verts, touched) in pieces {
        out.push(Polygon {
            region: first_region + labels[touched[0]],
            verts,
            face: Some((t, f)),
        });
    }
    let mut disc = |verts: Vec<PVert>, near: usize, far: usize| {
        out.push(Polygon {
            region: first_region + labels[near],
            verts: verts.clone(),
            face: None,
        });
        out.push(Polygon {
            region: first_region + labels[far],
            verts,
            face: None,
        });
    };
    for v in 0..4 {
        let others: Vec<usize> = (0..4).filter(|&o| o != v).collect();
        for j in 0..c.tris[v] {
            let verts = others.iter().map(|&o| c.point(v, o, j)).collect();
            disc(verts, gap_id(v, others[0], j), gap_id(v, others[0], j + 1));
        }
    }
    if let Some((q, n)) = c.quad {
        let [a, b, x, y] = QUAD_DEFN[q];
        let (ta, tb) = (c.tris[a], c.tris[b]);
        for j in 0..n {
            let verts = vec![
                c.point(a, x, ta + j),
                c.point(a, y, ta + j),
                c.point(b, y, tb + j),
                c.point(b, x, tb + j),
            ];
            disc(verts, gap_id(a, x, ta + j), gap_id(a, x, ta + j + 1));
        }
    }
    regions
}

impl NormalSurface {
    /// Triangulate the complement of this surface.
    ///
    /// The result is usually much larger than the input and may be
    /// disconnected. Octagons are first removed by retriangulating. Needs a
    /// compact embedded surface.
    pub fn cut_along(&self) -> Result<Triangulation> {
        if self.oct_position().is_some() {
            return self.remove_octs()?.cut_along();
        }
        if !self.is_embedded() {
            return Err(Error::precondition("cutting needs an embedded surface"));
        }
        let wide = self.compact_counts("cutting")?;
        let total: ExactInt = wide.iter().sum();
        if total > ExactInt::from(MAX_DISC_WALK) {
            return Err(Error::unsolved(format!(
                "surface has {total} discs, too many to cut along"
            )));
        }
        let tri = self.triangulation();
        let counts = wide.chunks(WIDE).map(Counts::new).collect::<Result<Vec<_>>>()?;

        let mut polys: Vec<Polygon> = Vec::new();
        let mut regions = 0;
        for (t, c) in counts.iter().enumerate() {
            regions += split_tetrahedron(t, c, regions, &mut polys);
        }

        let mut first = Vec::with_capacity(polys.len());
        let mut size = 0;
        for p in &polys {
            first.push(size);
            size += p.verts.len();
        }
        let mut out = Triangulation::with_size(size);
        let turn = Perm4::new(0, 1, 3, 2);

        // Around each polygon centre.
        for (i, p) in polys.iter().enumerate() {
            let m = p.verts.len();
            for k in 0..m {
                out.join(first[i] + k, 2, first[i] + (k + 1) % m, turn)?;
            }
        }

        // Across polygon edges inside a region.
        let mut shared: BTreeMap<(usize, PVert, PVert), Vec<(usize, PVert)>> = BTreeMap::new();
        for (i, p) in polys.iter().enumerate() {
            let m = p.verts.len();
            for k in 0..m {
                let (a, b) = (p.verts[k], p.verts[(k + 1) % m]);
                shared
                    .entry((p.region, a.min(b), a.max(b)))
                    .or_default()
                    .push((first[i] + k, a));
            }
        }
        for sides in shared.values() {
            let [(s, a), (t, b)] = sides.as_slice() else {
                return Err(Error::unsolved("cut region is not bounded by a closed surface"));
            };
            let perm = if a == b { Perm4::IDENTITY } else { Perm4::transposition(2, 3) };
            out.join(*s, 1, *t, perm)?;
        }

        // Across the faces of the original triangulation.
        let mut by_face: BTreeMap<(usize, usize, Vec<PVert>), usize> = BTreeMap::new();
        for (i, p) in polys.iter().enumerate() {
            if let Some((t, f)) = p.face {
                let mut key = p.verts.clone();
                key.sort();
                by_face.insert((t, f, key), i);
            }
        }
        for (i, p) in polys.iter().enumerate() {
            let Some((t, f)) = p.face else {
                continue;
            };
            let Some((u, g)) = tri.adjacent(t, f) else {
                continue;
            };
            let uf = g.apply(f);
            if (u, uf) < (t, f) {
                continue;
            }
            let image: Vec<PVert> = p.verts.iter().map(|&v| counts[t].map(g, v)).collect();
            let mut key = image.clone();
            key.sort();
            let j = *by_face
                .get(&(u, uf, key))
                .ok_or_else(|| Error::invalid("surface does not match across a face"))?;
            let other = &polys[j].verts;
            let m = image.len();
            for k in 0..m {
                let (a, b) = (image[k], image[(k + 1) % m]);
                let l = (0..m)
                    .find(|&l| {
                        let (x, y) = (other[l], other[(l + 1) % m]);
                        (x, y) == (a, b) || (x, y) == (b, a)
                    })
                    .ok_or_else(|| Error::invalid("face pieces do not match"))?;
                let perm = if other[l] == a { Perm4::IDENTITY } else { turn };
                out.join(first[i] + k, 0, first[j] + l, perm)?;
            }
        }
        tracing::debug!(regions, polygons = polys.len(), tetrahedra = size, "cut along surface");
        Ok(out)
    }
}
