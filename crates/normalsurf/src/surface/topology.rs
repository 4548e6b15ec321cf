//! Euler characteristic and disc-by-disc topology.
//!
//! The walk numbers every disc, then visits each glued face once and pairs
//! the arcs on its two sides. Two union-finds with a parity bit record how
//! the discs' sides and orientations line up; an odd cycle in the first
//! means the surface is one-sided, in the second that it is non-orientable.

use super::{wide_encoding, NormalSurface, WIDE};
use crate::cfg::MAX_DISC_WALK;
use crate::dsu::ParityDsu;
use crate::encoding::NormalCoords;
use crate::int::ExactInt;
use crate::matching::euler_char_functional;
use crate::tables::{edge_number, face_vertices, on_side_zero, quad_sep, QUAD_MEETING};
use crate::{Error, Result};

/// Result of one walk over the discs of a surface.
#[derive(Clone, Debug)]
pub(crate) struct DiscWalk {
    /// First disc id of each `(tet, wide kind)`.
    offsets: Vec<usize>,
    /// Component label of each disc.
    labels: Vec<usize>,
    components: usize,
    orientable: bool,
    two_sided: bool,
}

/// The one quad or octagon column (wide index) that cuts off corner `v` of
/// face `f`, if any discs of it exist.
fn corner_cutter(block: &[ExactInt], v: usize, f: usize) -> Option<usize> {
    let q = 4 + quad_sep(v, f);
    if !block[q].is_zero() {
        return Some(q);
    }
    QUAD_MEETING[v][f]
        .iter()
        .map(|&k| 7 + k as usize)
        .find(|&o| !block[o].is_zero())
}

/// Number of arcs around corner `v` of face `f`.
fn corner_arcs(block: &[ExactInt], v: usize, f: usize) -> ExactInt {
    let mut n = block[v].clone();
    if let Some(c) = corner_cutter(block, v, f) {
        n += &block[c];
    }
    n
}

fn as_count(x: &ExactInt) -> Result<usize> {
    x.to_i64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| Error::unsolved("disc count out of range"))
}

impl DiscWalk {
    fn run(s: &NormalSurface) -> Result<DiscWalk> {
        let wide = s.compact_counts("disc walk")?;
        let tri = s.triangulation();
        for block in wide.chunks(WIDE) {
            let kinds = block[4..].iter().filter(|x| !x.is_zero()).count();
            if kinds > 1 {
                return Err(Error::precondition("disc walk needs an embedded surface"));
            }
        }
        let total: ExactInt = wide.iter().sum();
        if total > ExactInt::from(MAX_DISC_WALK) {
            return Err(Error::unsolved(format!("surface has {total} discs, too many to walk")));
        }
        let mut offsets = Vec::with_capacity(wide.len() + 1);
        let mut acc = 0usize;
        for x in wide {
            offsets.push(acc);
            acc += as_count(x)?;
        }
        offsets.push(acc);

        let mut sides = ParityDsu::new(acc);
        let mut orient = ParityDsu::new(acc);
        // Disc carrying the `p`-th arc (from the corner) around corner `v` of
        // face `f`, and whether that disc's positive side faces the corner.
        let arc = |t: usize, v: usize, f: usize, p: usize| -> Result<(usize, bool)> {
            let block = &wide[WIDE * t..WIDE * (t + 1)];
            let tris = as_count(&block[v])?;
            if p < tris {
                return Ok((offsets[WIDE * t + v] + p, true));
            }
            let p = p - tris;
            let c = corner_cutter(block, v, f)
                .ok_or_else(|| Error::invalid("arc index out of range"))?;
            let n = as_count(&block[c])?;
            let near0 = on_side_zero((c - 4) % 3, v);
            let idx = if near0 { p } else { n - 1 - p };
            Ok((offsets[WIDE * t + c] + idx, near0))
        };

        for t in 0..tri.size() {
            for f in 0..4 {
                let Some((u, g)) = tri.adjacent(t, f) else {
                    continue;
                };
                if (u, g.apply(f)) < (t, f) {
                    continue;
                }
                let here = &wide[WIDE * t..WIDE * (t + 1)];
                let there = &wide[WIDE * u..WIDE * (u + 1)];
                for v in face_vertices(f) {
                    let (gv, gf) = (g.apply(v), g.apply(f));
                    let n = corner_arcs(here, v, f);
                    if n != corner_arcs(there, gv, gf) {
                        return Err(Error::invalid("arc counts disagree across a face"));
                    }
                    for p in 0..as_count(&n)? {
                        let (a, ta) = arc(t, v, f, p)?;
                        let (b, tb) = arc(u, gv, gf, p)?;
                        sides.union(a, b, ta != tb);
                        orient.union(a, b, (ta != tb) ^ g.is_even());
                    }
                }
            }
        }
        let (labels, components) = sides.labels();
        tracing::trace!(discs = acc, components, "disc walk");
        Ok(DiscWalk {
            offsets,
            labels,
            components,
            orientable: !orient.conflict,
            two_sided: !sides.conflict,
        })
    }
}

impl NormalSurface {
    /// Euler characteristic; fails for a spun surface.
    pub fn euler_char(&self) -> Result<ExactInt> {
        self.props
            .euler
            .get_or_init(|| {
                let counts = self.compact_counts("Euler characteristic")?;
                let f = euler_char_functional(self.triangulation(), wide_encoding())?;
                Ok(f.iter().zip(counts).map(|(&c, x)| x * c).sum())
            })
            .clone()
    }

    fn walk(&self) -> Result<&DiscWalk> {
        self.props
            .walk
            .get_or_init(|| DiscWalk::run(self))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Needs a compact embedded surface. The empty surface is orientable.
    pub fn is_orientable(&self) -> Result<bool> {
        Ok(self.walk()?.orientable)
    }

    pub fn is_two_sided(&self) -> Result<bool> {
        Ok(self.walk()?.two_sided)
    }

    /// At most one component.
    pub fn is_connected(&self) -> Result<bool> {
        Ok(self.walk()?.components <= 1)
    }

    pub fn count_components(&self) -> Result<usize> {
        Ok(self.walk()?.components)
    }

    /// The connected components, each as its own surface in standard
    /// coordinates (almost normal if octagons are present).
    pub fn components(&self) -> Result<Vec<NormalSurface>> {
        let walk = self.walk()?;
        let coords = if self.oct_position().is_some() {
            NormalCoords::AlmostNormal
        } else {
            NormalCoords::Standard
        };
        let width = if coords == NormalCoords::AlmostNormal { WIDE } else { 7 };
        let n = self.triangulation().size();
        let mut vecs = vec![vec![ExactInt::ZERO; n * width]; walk.components];
        for slot in 0..n * WIDE {
            let (t, kind) = (slot / WIDE, slot % WIDE);
            if kind >= width {
                continue;
            }
            for d in walk.offsets[slot]..walk.offsets[slot + 1] {
                vecs[walk.labels[d]][t * width + kind] += 1;
            }
        }
        vecs.into_iter()
            .map(|v| NormalSurface::from_coords(self.triangulation(), coords, v))
            .collect()
    }

    /// Number of boundary curves on the real boundary of the triangulation.
    pub fn count_boundaries(&self) -> Result<usize> {
        self.props
            .boundaries
            .get_or_init(|| self.compute_boundaries())
            .clone()
    }

    fn compute_boundaries(&self) -> Result<usize> {
        let wide = self.compact_counts("boundary curves")?;
        let tri = self.triangulation();
        if !tri.has_boundary_triangles() {
            return Ok(0);
        }
        let edges = tri.edges();
        let mut base = vec![0usize; edges.len()];
        let mut weight = vec![0usize; edges.len()];
        let mut total = 0usize;
        for (e, edge) in edges.iter().enumerate() {
            if !edge.boundary {
                continue;
            }
            base[e] = total;
            let w = self
                .edge_weight(e)?
                .ok_or_else(|| Error::precondition("boundary curves need a compact surface"))?;
            weight[e] = as_count(&w)?;
            total += weight[e];
        }
        if total as i64 > MAX_DISC_WALK {
            return Err(Error::unsolved("too many boundary points to walk"));
        }
        // (global edge, start vertex) for each local edge of each tetrahedron.
        let mut local = vec![(0usize, 0usize); 6 * tri.size()];
        for (e, edge) in edges.iter().enumerate() {
            for emb in &edge.embeddings {
                local[6 * emb.tet + emb.edge()] = (e, emb.perm.apply(0));
            }
        }
        // Point `p` counted from local vertex `from` along local edge `from`-`to`.
        let point = |t: usize, from: usize, to: usize, p: usize| -> usize {
            let (e, start) = local[6 * t + edge_number(from, to)];
            let idx = if from == start { p } else { weight[e] - 1 - p };
            base[e] + idx
        };
        let mut dsu = ParityDsu::new(total);
        for t in 0..tri.size() {
            let block = &wide[WIDE * t..WIDE * (t + 1)];
            for f in (0..4).filter(|&f| tri.adjacent(t, f).is_none()) {
                let [x, y, z] = face_vertices(f);
                for (v, a, b) in [(x, y, z), (y, z, x), (z, x, y)] {
                    for p in 0..as_count(&corner_arcs(block, v, f))? {
                        dsu.union(point(t, v, a, p), point(t, v, b, p), false);
                    }
                }
            }
        }
        Ok(dsu.labels().1)
    }

    /// Compact, connected, `χ = 2` and no real boundary.
    pub fn is_sphere(&self) -> Result<bool> {
        if !self.is_compact() || self.has_real_boundary() {
            return Ok(false);
        }
        Ok(self.euler_char()? == ExactInt::from(2) && self.is_connected()?)
    }

    /// Compact, connected, `χ = 1` and meets the real boundary.
    pub fn is_disc(&self) -> Result<bool> {
        if !self.is_compact() || !self.has_real_boundary() {
            return Ok(false);
        }
        Ok(self.euler_char()? == ExactInt::ONE && self.is_connected()?)
    }

    /// Compact without real boundary, connected, orientable and `χ = 0`.
    pub fn is_torus(&self) -> Result<bool> {
        if !self.is_compact() || self.has_real_boundary() {
            return Ok(false);
        }
        Ok(self.euler_char()?.is_zero() && self.is_connected()? && self.is_orientable()?)
    }

    /// Compact, connected, orientable, `χ = 0` with two boundary curves.
    pub fn is_annulus(&self) -> Result<bool> {
        if !self.is_compact() || !self.has_real_boundary() {
            return Ok(false);
        }
        Ok(self.euler_char()?.is_zero()
            && self.is_connected()?
            && self.is_orientable()?
            && self.count_boundaries()? == 2)
    }
}
