//! Matching equations: the linear system every normal surface satisfies.
//!
//! Rows by coordinate system
//! - Quad family: one row per non-boundary edge. Walking the edge link, each
//!   embedding `(t, p)` adds `+1` at quad `qs(p0,p2)` and `-1` at quad
//!   `qs(p0,p3)`; octagons contribute with the opposite pattern.
//! - Standard family: three rows per internal triangle, one per corner,
//!   equating the arcs seen from the two sides of the triangle.
//! - Closed variants: the quad rows, then two rows per cusp supplied by the
//!   triangulation's [`PeripheralCurves`] oracle.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;

use nalgebra::DMatrix;

use crate::encoding::{NormalCoords, NormalEncoding};
use crate::int::ExactInt;
use crate::tables::{quad_sep, QUAD_MEETING};
use crate::triangulation::Triangulation;
use crate::{Error, Result};

/// Source of meridian and longitude functionals for the cusps of an ideal
/// triangulation, in quad coordinates (`3n` entries each).
pub trait PeripheralCurves: Send + Sync + Debug {
    fn cusp_functionals(&self, tri: &Triangulation) -> Result<Vec<[Vec<i64>; 2]>>;
}

/// Peripheral functionals supplied explicitly by the caller.
#[derive(Clone, Debug, Default)]
pub struct FixedPeripheralCurves {
    cusps: Vec<[Vec<i64>; 2]>,
}

impl FixedPeripheralCurves {
    /// One `[meridian, longitude]` pair per cusp.
    pub fn new(cusps: Vec<[Vec<i64>; 2]>) -> Self {
        Self { cusps }
    }
}

impl PeripheralCurves for FixedPeripheralCurves {
    fn cusp_functionals(&self, tri: &Triangulation) -> Result<Vec<[Vec<i64>; 2]>> {
        let len = 3 * tri.size();
        if self.cusps.iter().flatten().any(|f| f.len() != len) {
            return Err(Error::invalid(format!(
                "peripheral functionals must have {len} quad coefficients"
            )));
        }
        Ok(self.cusps.clone())
    }
}

/// Peripheral functionals read off the cusps themselves.
///
/// Walking the dual graph of a cusp's link, the triangle count in each corner
/// is determined by the previous corner plus a quad difference across the
/// shared face. Around a closed loop those differences sum to a linear form
/// in the quads, and a quad solution extends to triangles iff every such
/// form vanishes. Each cusp contributes two forms that are independent
/// modulo the quad matching equations; a zero form stands in when fewer
/// exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct CuspLinkCurves;

impl CuspLinkCurves {
    /// Loop forms of one cusp, one per non-tree edge of a breadth-first
    /// spanning tree of the link's dual graph.
    fn loop_forms(tri: &Triangulation, vertex: usize) -> Vec<Vec<i64>> {
        let n = tri.size();
        let corners = &tri.vertices()[vertex].embeddings;
        let mut index = HashMap::with_capacity(corners.len());
        for (i, c) in corners.iter().enumerate() {
            index.insert((c.tet, c.vertex), i);
        }
        let mut path: Vec<Option<Vec<i64>>> = vec![None; corners.len()];
        path[0] = Some(vec![0; 3 * n]);
        let mut queue = VecDeque::from([0usize]);
        let mut forms = Vec::new();
        while let Some(i) = queue.pop_front() {
            let (t, v) = (corners[i].tet, corners[i].vertex);
            let here = path[i].clone().unwrap_or_default();
            for f in (0..4).filter(|&f| f != v) {
                let Some((d, g)) = tri.adjacent(t, f) else { continue };
                let (dv, df) = (g.apply(v), g.apply(f));
                let mut step = here.clone();
                step[3 * t + quad_sep(v, f)] += 1;
                step[3 * d + quad_sep(dv, df)] -= 1;
                let Some(&j) = index.get(&(d, dv)) else { continue };
                match &path[j] {
                    None => {
                        path[j] = Some(step);
                        queue.push_back(j);
                    }
                    Some(there) => {
                        let form: Vec<i64> = step.iter().zip(there).map(|(a, b)| a - b).collect();
                        if form.iter().any(|&x| x != 0) {
                            forms.push(form);
                        }
                    }
                }
            }
        }
        forms
    }
}

impl PeripheralCurves for CuspLinkCurves {
    fn cusp_functionals(&self, tri: &Triangulation) -> Result<Vec<[Vec<i64>; 2]>> {
        let len = 3 * tri.size();
        let quad = quad_rows(tri, NormalEncoding::new(NormalCoords::Quad));
        let base = quad.nrows();
        let mut cusps = Vec::new();
        for (vertex, _) in tri.vertices().iter().enumerate().filter(|(_, v)| v.is_ideal()) {
            let forms = Self::loop_forms(tri, vertex);
            let stacked = DMatrix::from_fn(base + forms.len(), len, |r, c| {
                if r < base {
                    quad[(r, c)]
                } else {
                    forms[r - base][c]
                }
            });
            let basis = MatchingEquations::from_matrix(stacked).row_basis();
            let mut picked = basis
                .rows
                .iter()
                .filter(|&&r| r >= base)
                .map(|&r| forms[r - base].clone());
            let pair = [
                picked.next().unwrap_or_else(|| vec![0; len]),
                picked.next().unwrap_or_else(|| vec![0; len]),
            ];
            if picked.next().is_some() {
                return Err(Error::precondition(format!(
                    "cusp at vertex {vertex} has more than two independent loops"
                )));
            }
            cusps.push(pair);
        }
        Ok(cusps)
    }
}

/// Integer matrix `M` with `M v = 0` for every normal surface vector `v`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchingEquations {
    m: DMatrix<i64>,
}

/// Linearly independent subset of the rows, in original order.
#[derive(Clone, Debug)]
pub struct RowBasis {
    pub rank: usize,
    /// Indices into the original rows.
    pub rows: Vec<usize>,
}

impl MatchingEquations {
    pub fn from_matrix(m: DMatrix<i64>) -> Self {
        Self { m }
    }

    pub fn rows(&self) -> usize {
        self.m.nrows()
    }

    pub fn cols(&self) -> usize {
        self.m.ncols()
    }

    pub fn entry(&self, r: usize, c: usize) -> i64 {
        self.m[(r, c)]
    }

    pub fn row(&self, r: usize) -> Vec<i64> {
        self.m.row(r).iter().copied().collect()
    }

    pub fn matrix(&self) -> &DMatrix<i64> {
        &self.m
    }

    /// `row(r) · v`, exactly.
    pub fn dot(&self, r: usize, v: &[ExactInt]) -> ExactInt {
        let mut acc = ExactInt::ZERO;
        for (c, x) in v.iter().enumerate() {
            let a = self.m[(r, c)];
            if a != 0 && !x.is_zero() {
                acc += x * a;
            }
        }
        acc
    }

    pub fn is_satisfied_by(&self, v: &[ExactInt]) -> bool {
        v.len() == self.cols() && (0..self.rows()).all(|r| self.dot(r, v).is_zero())
    }

    /// Choose a maximal independent set of rows by fraction-free elimination.
    pub fn row_basis(&self) -> RowBasis {
        let cols = self.cols();
        // Echelon rows with their pivot columns.
        let mut echelon: Vec<(usize, Vec<ExactInt>)> = Vec::new();
        let mut keep = Vec::new();
        for r in 0..self.rows() {
            let mut row: Vec<ExactInt> =
                (0..cols).map(|c| ExactInt::from(self.m[(r, c)])).collect();
            for (pc, er) in &echelon {
                if row[*pc].is_zero() {
                    continue;
                }
                let a = er[*pc].clone();
                let b = row[*pc].clone();
                for c in 0..cols {
                    row[c] = &row[c] * &a - &er[c] * &b;
                }
                crate::int::scale_down(&mut row);
            }
            if let Some(pc) = row.iter().position(|x| !x.is_zero()) {
                echelon.push((pc, row));
                keep.push(r);
            }
        }
        RowBasis {
            rank: keep.len(),
            rows: keep,
        }
    }

    /// The submatrix on the chosen rows.
    pub fn restrict_rows(&self, rows: &[usize]) -> MatchingEquations {
        let m = DMatrix::from_fn(rows.len(), self.cols(), |r, c| self.m[(rows[r], c)]);
        MatchingEquations { m }
    }
}

fn add(m: &mut DMatrix<i64>, r: usize, c: usize, v: i64) {
    m[(r, c)] += v;
}

/// Build the matching equations for `coords` on `tri`.
///
/// Closed variants fail with `FailedPrecondition` when the triangulation has
/// no peripheral-curve oracle or is not an orientable ideal triangulation
/// whose cusps are all tori.
pub fn make_matching_equations(
    tri: &Triangulation,
    coords: NormalCoords,
) -> Result<MatchingEquations> {
    let enc = NormalEncoding::new(coords);
    let m = if enc.stores_triangles() {
        standard_rows(tri, enc)
    } else {
        let mut m = quad_rows(tri, enc);
        if coords.is_closed_variant() {
            let extra = closed_rows(tri, enc)?;
            let base = m.nrows();
            m = m.resize_vertically(base + extra.len(), 0);
            for (i, row) in extra.iter().enumerate() {
                for (c, &v) in row.iter().enumerate() {
                    m[(base + i, c)] = v;
                }
            }
        }
        m
    };
    tracing::trace!(?coords, rows = m.nrows(), cols = m.ncols(), "matching equations");
    Ok(MatchingEquations { m })
}

fn quad_rows(tri: &Triangulation, enc: NormalEncoding) -> DMatrix<i64> {
    let w = enc.block_size();
    let q = enc.quad_offset();
    let o = enc.oct_offset();
    let internal: Vec<_> = tri.edges().iter().filter(|e| !e.boundary).collect();
    let mut m = DMatrix::zeros(internal.len(), tri.size() * w);
    for (r, e) in internal.iter().enumerate() {
        for emb in &e.embeddings {
            let p = emb.perm;
            let (p0, p2, p3) = (p.apply(0), p.apply(2), p.apply(3));
            let base = emb.tet * w;
            add(&mut m, r, base + q + quad_sep(p0, p2), 1);
            add(&mut m, r, base + q + quad_sep(p0, p3), -1);
            if enc.stores_octagons() {
                add(&mut m, r, base + o + quad_sep(p0, p3), 1);
                add(&mut m, r, base + o + quad_sep(p0, p2), -1);
            }
        }
    }
    m
}

/// Columns (with coefficient 1) counting arcs around vertex `v` on face `f`
/// of tetrahedron `t`.
pub(crate) fn arc_columns(enc: NormalEncoding, t: usize, v: usize, f: usize) -> Vec<usize> {
    let w = enc.block_size();
    let base = t * w;
    let mut cols = vec![base + v, base + enc.quad_offset() + quad_sep(v, f)];
    if enc.stores_octagons() {
        for k in QUAD_MEETING[v][f] {
            cols.push(base + enc.oct_offset() + k as usize);
        }
    }
    cols
}

fn standard_rows(tri: &Triangulation, enc: NormalEncoding) -> DMatrix<i64> {
    let internal: Vec<_> = tri.triangles().iter().filter(|f| !f.is_boundary()).collect();
    let mut m = DMatrix::zeros(3 * internal.len(), tri.size() * enc.block_size());
    for (i, f) in internal.iter().enumerate() {
        let (front, back) = (f.embeddings[0], f.embeddings[1]);
        for j in 0..3 {
            let r = 3 * i + j;
            for c in arc_columns(enc, front.tet, front.perm.apply(j), front.face()) {
                add(&mut m, r, c, 1);
            }
            for c in arc_columns(enc, back.tet, back.perm.apply(j), back.face()) {
                add(&mut m, r, c, -1);
            }
        }
    }
    m
}

/// Check that closed-variant coordinates make sense for `tri`.
pub(crate) fn check_closed_preconditions(tri: &Triangulation) -> Result<()> {
    if tri.peripheral_curves().is_none() {
        return Err(Error::precondition("closed coordinates need peripheral curve data"));
    }
    let tori = tri
        .vertices()
        .iter()
        .filter(|v| v.is_ideal())
        .all(|v| v.link_euler == 0 && v.link_orientable);
    let shape_ok = tri.is_valid() && tri.is_ideal() && tri.is_orientable();
    if !shape_ok || tri.has_boundary_triangles() || !tori {
        return Err(Error::precondition(
            "closed coordinates need a valid orientable ideal triangulation with torus cusps",
        ));
    }
    Ok(())
}

/// Peripheral rows widened to `enc`: an octagon of type `k` counts as quads
/// `k+1` and `k+2` together.
pub(crate) fn closed_rows(tri: &Triangulation, enc: NormalEncoding) -> Result<Vec<Vec<i64>>> {
    check_closed_preconditions(tri)?;
    let oracle = tri
        .peripheral_curves()
        .ok_or_else(|| Error::precondition("closed coordinates need peripheral curve data"))?;
    let cusps = oracle.cusp_functionals(tri)?;
    let n = tri.size();
    let w = enc.block_size();
    let mut rows = Vec::with_capacity(2 * cusps.len());
    for f in cusps.iter().flatten() {
        if f.len() != 3 * n {
            return Err(Error::invalid("peripheral functional has the wrong length"));
        }
        let mut row = vec![0i64; n * w];
        for t in 0..n {
            let quad = &f[3 * t..3 * t + 3];
            for (k, &c) in quad.iter().enumerate() {
                row[t * w + enc.quad_offset() + k] = c;
            }
            if enc.stores_octagons() {
                for k in 0..3 {
                    row[t * w + enc.oct_offset() + k] = quad[(k + 1) % 3] + quad[(k + 2) % 3];
                }
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Coefficients of the linear function `χ` over an encoding that stores
/// triangles; valid for compact surfaces.
///
/// `χ = Σ edge weights − Σ triangle arcs + Σ discs`, each edge and triangle
/// read through its first embedding.
pub fn euler_char_functional(tri: &Triangulation, enc: NormalEncoding) -> Result<Vec<i64>> {
    if !enc.stores_triangles() {
        return Err(Error::invalid("euler functional needs triangle coordinates"));
    }
    let w = enc.block_size();
    let mut f = vec![1i64; tri.size() * w];
    for e in tri.edges() {
        let emb = e.embeddings[0];
        for c in edge_columns(enc, emb.tet, emb.perm.apply(0), emb.perm.apply(1)) {
            f[c] += 1;
        }
    }
    for t in tri.triangles() {
        let emb = t.front();
        for j in 0..3 {
            for c in arc_columns(enc, emb.tet, emb.perm.apply(j), emb.face()) {
                f[c] -= 1;
            }
        }
    }
    Ok(f)
}

/// Columns (with multiplicity) crossing the edge `ab` of tetrahedron `t`.
pub(crate) fn edge_columns(enc: NormalEncoding, t: usize, a: usize, b: usize) -> Vec<usize> {
    let base = t * enc.block_size();
    let q = enc.quad_offset();
    let mut cols = Vec::with_capacity(8);
    if enc.stores_triangles() {
        cols.push(base + a);
        cols.push(base + b);
    }
    for k in QUAD_MEETING[a][b] {
        cols.push(base + q + k as usize);
    }
    if enc.stores_octagons() {
        let o = enc.oct_offset();
        for k in 0..3 {
            cols.push(base + o + k);
        }
        cols.push(base + o + quad_sep(a, b));
    }
    cols
}
