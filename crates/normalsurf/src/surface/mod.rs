//! Concrete normal and almost normal surfaces.
//!
//! Purpose
//! - `NormalSurface` is a triangulation snapshot, an encoding and an exact
//!   coordinate vector. Everything else is derived from those three and
//!   cached on first use.
//! - Queries read disc counts through one 10-wide view per tetrahedron
//!   (triangles, quads, octagons). Reduced vectors get their triangles
//!   reconstructed on demand; a spun surface has no finite triangle counts,
//!   so its triangle queries return `None`.
//!
//! Layout
//! - `mod.rs`: the type, constructors, counts and local queries, equality.
//! - `topology.rs`: Euler characteristic and the disc walks (orientability,
//!   two-sidedness, components, boundary curves).
//! - `arith.rs`: sums, multiples and compatibility tests.
//! - `links.rs`: vertex and edge links.
//! - `crush.rs`, `octs.rs`, `cut.rs`, `compress.rs`: operations that build
//!   new triangulations.

mod arith;
mod compress;
mod crush;
mod cut;
mod links;
mod octs;
mod topology;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::encoding::{NormalCoords, NormalEncoding};
use crate::int::ExactInt;
use crate::matching::{arc_columns, edge_columns};
use crate::tables::QUAD_DEFN;
use crate::triangulation::Triangulation;
use crate::{Error, Result};

pub(crate) use topology::DiscWalk;

/// Width of the per-tetrahedron view used by every derived query.
pub(crate) const WIDE: usize = 10;

/// A disc type inside one tetrahedron: `kind` is 0..3 for triangles, 4..6
/// for quads and 7..9 for octagons, or a plain quad/octagon type where the
/// context says so.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscType {
    pub tet: usize,
    pub kind: usize,
}

#[derive(Clone, Debug, Default)]
struct Props {
    /// Wide counts; `None` for a surface that spins into a cusp.
    wide: OnceLock<Option<Vec<ExactInt>>>,
    euler: OnceLock<Result<ExactInt>>,
    walk: OnceLock<Result<DiscWalk>>,
    boundaries: OnceLock<Result<usize>>,
}

/// A normal or almost normal surface in a fixed triangulation image.
#[derive(Clone)]
pub struct NormalSurface {
    tri: Triangulation,
    enc: NormalEncoding,
    vec: Vec<ExactInt>,
    name: String,
    props: Props,
}

impl NormalSurface {
    /// Wrap `vec` as a surface in `tri`, stored with encoding `enc`.
    ///
    /// The surface keeps a snapshot of `tri`; later edits to `tri` do not
    /// reach it. Fails if `enc` is invalid or the length is not
    /// `tri.size() * enc.block_size()`.
    pub fn new(tri: &Triangulation, enc: NormalEncoding, vec: Vec<ExactInt>) -> Result<Self> {
        if !enc.is_valid() {
            return Err(Error::invalid("surface with an invalid encoding"));
        }
        let want = tri.size() * enc.block_size();
        if vec.len() != want {
            return Err(Error::invalid(format!(
                "surface vector has {} coordinates, expected {want}",
                vec.len()
            )));
        }
        Ok(Self {
            tri: tri.snapshot(),
            enc,
            vec,
            name: String::new(),
            props: Props::default(),
        })
    }

    pub fn from_coords(
        tri: &Triangulation,
        coords: NormalCoords,
        vec: Vec<ExactInt>,
    ) -> Result<Self> {
        Self::new(tri, NormalEncoding::new(coords), vec)
    }

    /// The empty surface.
    pub fn zero(tri: &Triangulation, enc: NormalEncoding) -> Self {
        Self {
            tri: tri.snapshot(),
            enc,
            vec: vec![ExactInt::ZERO; tri.size() * enc.block_size()],
            name: String::new(),
            props: Props::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.tri
    }

    pub fn encoding(&self) -> NormalEncoding {
        self.enc
    }

    /// The stored vector, in [`Self::encoding`].
    pub fn vector(&self) -> &[ExactInt] {
        &self.vec
    }

    pub fn into_vector(self) -> Vec<ExactInt> {
        self.vec
    }

    fn block(&self, tet: usize) -> &[ExactInt] {
        let w = self.enc.block_size();
        &self.vec[tet * w..(tet + 1) * w]
    }

    /// Wide counts, 10 per tetrahedron, or `None` for a spun surface.
    pub(crate) fn wide(&self) -> Option<&[ExactInt]> {
        self.props.wide.get_or_init(|| self.compute_wide()).as_deref()
    }

    /// Wide counts, failing with `FailedPrecondition` for a spun surface.
    pub(crate) fn compact_counts(&self, op: &str) -> Result<&[ExactInt]> {
        self.wide()
            .ok_or_else(|| Error::precondition(format!("{op} needs a compact surface")))
    }

    fn compute_wide(&self) -> Option<Vec<ExactInt>> {
        let mut v = self.vec.clone();
        let enc = match self.enc.reconstruct_triangles(&self.tri, &mut v) {
            Ok(enc) => enc,
            Err(_) => return None,
        };
        let w = enc.block_size();
        let mut out = Vec::with_capacity(self.tri.size() * WIDE);
        for block in v.chunks(w.max(1)).take(self.tri.size()) {
            out.extend_from_slice(&block[..7]);
            if enc.stores_octagons() {
                out.extend_from_slice(&block[7..10]);
            } else {
                out.extend(std::iter::repeat(ExactInt::ZERO).take(3));
            }
        }
        Some(out)
    }

    /// Number of triangles of type `vertex` in `tet`; `None` if infinite.
    pub fn triangles(&self, tet: usize, vertex: usize) -> Option<ExactInt> {
        if self.enc.stores_triangles() {
            return Some(self.block(tet)[vertex].clone());
        }
        self.wide().map(|w| w[WIDE * tet + vertex].clone())
    }

    pub fn quads(&self, tet: usize, quad: usize) -> ExactInt {
        self.block(tet)[self.enc.quad_offset() + quad].clone()
    }

    /// Always zero for an encoding without octagons.
    pub fn octs(&self, tet: usize, oct: usize) -> ExactInt {
        if !self.enc.stores_octagons() {
            return ExactInt::ZERO;
        }
        self.block(tet)[self.enc.oct_offset() + oct].clone()
    }

    /// Intersections with edge `edge`; `None` if infinite.
    pub fn edge_weight(&self, edge: usize) -> Result<Option<ExactInt>> {
        let emb = self
            .tri
            .edges()
            .get(edge)
            .map(|e| e.embeddings[0])
            .ok_or_else(|| Error::invalid(format!("edge {edge} out of range")))?;
        let Some(wide) = self.wide() else {
            return Ok(None);
        };
        let cols = edge_columns(wide_encoding(), emb.tet, emb.perm.apply(0), emb.perm.apply(1));
        Ok(Some(cols.into_iter().map(|c| &wide[c]).sum()))
    }

    /// Arcs on triangle `triangle` cutting off its corner `vertex` (0..3);
    /// `None` if infinite.
    pub fn arcs(&self, triangle: usize, vertex: usize) -> Result<Option<ExactInt>> {
        if vertex >= 3 {
            return Err(Error::invalid(format!("triangle corner {vertex} out of range")));
        }
        let emb = self
            .tri
            .triangles()
            .get(triangle)
            .map(|t| t.front())
            .ok_or_else(|| Error::invalid(format!("triangle {triangle} out of range")))?;
        let Some(wide) = self.wide() else {
            return Ok(None);
        };
        let cols = arc_columns(wide_encoding(), emb.tet, emb.perm.apply(vertex), emb.face());
        Ok(Some(cols.into_iter().map(|c| &wide[c]).sum()))
    }

    pub fn is_empty(&self) -> bool {
        self.vec.iter().all(ExactInt::is_zero)
    }

    /// Finitely many discs.
    pub fn is_compact(&self) -> bool {
        self.enc.stores_triangles() || self.wide().is_some()
    }

    /// Whether some disc meets a boundary triangle of the triangulation.
    pub fn has_real_boundary(&self) -> bool {
        if self.tri.is_closed() {
            return false;
        }
        for (t, tet) in self.tri.tetrahedra().iter().enumerate() {
            if !tet.has_boundary() {
                continue;
            }
            if (0..3).any(|k| self.quads(t, k).is_positive() || self.octs(t, k).is_positive()) {
                return true;
            }
            for v in 0..4 {
                let hits = (0..4).any(|f| f != v && tet.adjacent(f).is_none());
                // Infinite triangles count as present.
                let present = self.triangles(t, v).map_or(true, |x| x.is_positive());
                if hits && present {
                    return true;
                }
            }
        }
        false
    }

    /// The octagon type in use, as `(tet, octagon type)`.
    pub fn oct_position(&self) -> Option<DiscType> {
        if !self.enc.stores_octagons() {
            return None;
        }
        (0..self.tri.size())
            .flat_map(|t| (0..3).map(move |k| DiscType { tet: t, kind: k }))
            .find(|d| !self.octs(d.tet, d.kind).is_zero())
    }

    /// More than one octagonal disc (assumes a single octagon type).
    pub fn has_multiple_oct_discs(&self) -> bool {
        self.oct_position()
            .is_some_and(|d| self.octs(d.tet, d.kind) != ExactInt::ONE)
    }

    /// No quads and no octagons.
    pub fn is_vertex_linking(&self) -> bool {
        (0..self.tri.size())
            .all(|t| (0..3).all(|k| self.quads(t, k).is_zero() && self.octs(t, k).is_zero()))
    }

    /// The vertex that a multiple of this surface links, if any.
    ///
    /// A triangle-only surface satisfying the matching equations is a sum of
    /// vertex links, so it suffices that every triangle sits at one vertex.
    pub fn vertex_link(&self) -> Option<usize> {
        if !self.enc.could_be_vertex_link() || !self.is_vertex_linking() {
            return None;
        }
        let mut found = None;
        for t in 0..self.tri.size() {
            for v in 0..4 {
                if self.triangles(t, v)?.is_zero() {
                    continue;
                }
                let vert = self.tri.tet_vertex(t, v);
                match found {
                    None => found = Some(vert),
                    Some(x) if x != vert => return None,
                    Some(_) => {}
                }
            }
        }
        found
    }

    /// Edges whose thin link is a multiple of this surface; at most two.
    pub fn is_thin_edge_link(&self) -> (Option<usize>, Option<usize>) {
        if self.oct_position().is_some() {
            return (None, None);
        }
        let Some((t, q)) = (0..self.tri.size())
            .flat_map(|t| (0..3).map(move |q| (t, q)))
            .find(|&(t, q)| !self.quads(t, q).is_zero())
        else {
            return (None, None);
        };
        let d = QUAD_DEFN[q];
        let mut candidates = vec![
            self.tri.tet_edge(t, crate::tables::edge_number(d[0], d[1])),
            self.tri.tet_edge(t, crate::tables::edge_number(d[2], d[3])),
        ];
        candidates.dedup();
        let with_triangles = self.enc.stores_triangles();
        let mine = self.primitive_counts(with_triangles);
        let mut hits = candidates.into_iter().filter(|&e| {
            NormalSurface::edge_link_of(&self.tri, e)
                .map(|link| link.primitive_counts(with_triangles) == mine)
                .unwrap_or(false)
        });
        (hits.next(), hits.next())
    }

    /// Exactly one quad per tetrahedron and nothing else.
    pub fn is_splitting(&self) -> bool {
        (0..self.tri.size()).all(|t| {
            let tris_zero = (0..4).all(|v| self.triangles(t, v).is_some_and(|x| x.is_zero()));
            let quads: ExactInt = (0..3).map(|q| self.quads(t, q)).sum();
            let octs_zero = (0..3).all(|k| self.octs(t, k).is_zero());
            tris_zero && octs_zero && quads == ExactInt::ONE
        })
    }

    /// If every tetrahedron holds at most one disc, the number of discs;
    /// otherwise 0.
    pub fn is_central(&self) -> usize {
        let Some(wide) = self.wide() else {
            return 0;
        };
        let mut tot = 0;
        for block in wide.chunks(WIDE) {
            let discs: ExactInt = block.iter().sum();
            if discs > ExactInt::ONE {
                return 0;
            }
            if discs.is_positive() {
                tot += 1;
            }
        }
        tot
    }

    /// The vector in encoding `target`.
    ///
    /// Triangles are reconstructed when `target` stores them and this
    /// surface does not; octagon columns are padded with zeros. Fails if
    /// that needs finite triangles of a spun surface, or would drop a
    /// non-zero octagon.
    pub fn vector_in(&self, target: NormalEncoding) -> Result<Vec<ExactInt>> {
        if target == self.enc {
            return Ok(self.vec.clone());
        }
        if self.oct_position().is_some() && !target.stores_octagons() {
            return Err(Error::invalid("re-encoding would drop octagons"));
        }
        let wide = if target.stores_triangles() && !self.enc.stores_triangles() {
            Some(self.compact_counts("re-encoding with triangles")?)
        } else {
            None
        };
        let n = self.tri.size();
        let mut out = Vec::with_capacity(n * target.block_size());
        for t in 0..n {
            if target.stores_triangles() {
                match wide {
                    Some(w) => out.extend_from_slice(&w[WIDE * t..WIDE * t + 4]),
                    None => out.extend_from_slice(&self.block(t)[..4]),
                }
            }
            out.extend((0..3).map(|q| self.quads(t, q)));
            if target.stores_octagons() {
                out.extend((0..3).map(|k| self.octs(t, k)));
            }
        }
        Ok(out)
    }

    /// The same surface stored with encoding `target`.
    pub fn reencoded(&self, target: NormalEncoding) -> Result<NormalSurface> {
        let vec = self.vector_in(target)?;
        Ok(NormalSurface::new(&self.tri, target, vec)?.with_name(self.name.clone()))
    }

    /// Disc counts with triangles as `None` when unknown, 10 per tetrahedron.
    fn key(&self) -> Vec<Option<ExactInt>> {
        let n = self.tri.size();
        let mut out = Vec::with_capacity(n * WIDE);
        for t in 0..n {
            out.extend((0..4).map(|v| self.triangles(t, v)));
            out.extend((0..3).map(|q| Some(self.quads(t, q))));
            out.extend((0..3).map(|k| Some(self.octs(t, k))));
        }
        out
    }

    /// Disc counts with the gcd divided out; triangles are left out unless
    /// `with_triangles`, in which case they must be known.
    fn primitive_counts(&self, with_triangles: bool) -> Vec<ExactInt> {
        let mut out = Vec::new();
        for t in 0..self.tri.size() {
            if with_triangles {
                out.extend((0..4).map(|v| self.triangles(t, v).unwrap_or_default()));
            }
            out.extend((0..3).map(|q| self.quads(t, q)));
            out.extend((0..3).map(|k| self.octs(t, k)));
        }
        crate::int::scale_down(&mut out);
        out
    }

    fn reset_props(&mut self) {
        self.props = Props::default();
    }
}

/// The 10-wide encoding behind [`NormalSurface::wide`].
pub(crate) fn wide_encoding() -> NormalEncoding {
    NormalEncoding::new(NormalCoords::AlmostNormal)
}

/// `None` (infinite) sorts after every finite count.
fn cmp_count(a: &Option<ExactInt>, b: &Option<ExactInt>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

impl PartialEq for NormalSurface {
    fn eq(&self, other: &Self) -> bool {
        if self.tri.size() != other.tri.size() {
            return false;
        }
        if self.enc == other.enc {
            return self.vec == other.vec;
        }
        self.key() == other.key()
    }
}

impl Eq for NormalSurface {}

impl PartialOrd for NormalSurface {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalSurface {
    /// By triangulation size, then lexicographically on disc counts.
    fn cmp(&self, other: &Self) -> Ordering {
        self.tri.size().cmp(&other.tri.size()).then_with(|| {
            let (a, b) = (self.key(), other.key());
            a.iter()
                .zip(&b)
                .map(|(x, y)| cmp_count(x, y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }
}

impl Hash for NormalSurface {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tri.size().hash(state);
        self.key().hash(state);
    }
}

impl fmt::Debug for NormalSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalSurface")
            .field("name", &self.name)
            .field("encoding", &self.enc.int_value())
            .field("vector", &format_args!("{self}"))
            .finish()
    }
}

impl fmt::Display for NormalSurface {
    /// Per tetrahedron `t0 t1 t2 t3 ; q0 q1 q2 [; o0 o1 o2]`, blocks joined
    /// by `||`; an unknown triangle prints as `inf`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in 0..self.tri.size() {
            if t > 0 {
                write!(f, " || ")?;
            }
            for v in 0..4 {
                match self.triangles(t, v) {
                    Some(x) => write!(f, "{x} ")?,
                    None => write!(f, "inf ")?,
                }
            }
            write!(f, ";")?;
            for q in 0..3 {
                write!(f, " {}", self.quads(t, q))?;
            }
            if self.enc.stores_octagons() {
                write!(f, " ;")?;
                for k in 0..3 {
                    write!(f, " {}", self.octs(t, k))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
