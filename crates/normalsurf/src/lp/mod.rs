//! Linear programming for the tree traversal.
//!
//! Purpose
//! - `LpInitialTableaux` is the starting system, built once per search: a
//!   row basis of the matching equations plus one row per extra linear
//!   constraint.
//! - `LpData` is a working tableau. The tree clones it at each branch and
//!   adds constraints `x = 0`, `x ≥ 1` or "these two quads form an octagon".
//!
//! Column order
//! - Quad columns first (`3t + q`), then triangle columns (`3n + 4t + v`) when
//!   the search runs in standard coordinates, then one column per extra
//!   constraint.
//! - Almost normal systems run on the normal tableau; an octagon is the sum
//!   of two quad columns of one tetrahedron.
//!
//! Arithmetic is fraction-free and checked. A fixed-width integer type
//! reports `Error::IntegerOverflow`; [`hadamard::choose_int`] picks a width
//! that cannot overflow for the unconstrained searches.

mod data;
pub mod hadamard;

use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Range;

use nalgebra::DMatrix;

pub use data::LpData;

use crate::encoding::{NormalCoords, NormalEncoding};
use crate::int::{ExactInt, LpInt};
use crate::matching::{
    check_closed_preconditions, closed_rows, euler_char_functional, make_matching_equations,
    MatchingEquations,
};
use crate::triangulation::Triangulation;
use crate::{Error, Result};

/// Extra linear constraints carried by the tableau.
///
/// Each constraint adds a column `x_e` and a row `Σ c_i x_i − x_e = 0`; the
/// bundle then restricts `x_e` at the root.
pub trait LpConstraint: Clone + Debug + Send + Sync + 'static {
    const NAME: &'static str;

    /// Added to the coefficient of each of the two quad columns that form an
    /// octagon.
    const OCT_ADJUSTMENT: i64;

    /// `Ok` if the bundle makes sense for a search in `coords` on `tri`.
    fn check(tri: &Triangulation, coords: NormalCoords) -> Result<()>;

    /// One coefficient row per extra column, over the coordinates of `enc`.
    fn coefficients(tri: &Triangulation, enc: NormalEncoding) -> Result<Vec<Vec<i64>>>;

    /// Restrict the extra columns of a freshly started tableau.
    fn constrain<T: LpInt>(lp: &mut LpData<Self, T>) -> Result<()>;
}

/// No extra constraints.
#[derive(Clone, Copy, Debug, Default)]
pub struct LpConstraintNone;

impl LpConstraint for LpConstraintNone {
    const NAME: &'static str = "none";
    const OCT_ADJUSTMENT: i64 = 0;

    fn check(_tri: &Triangulation, _coords: NormalCoords) -> Result<()> {
        Ok(())
    }

    fn coefficients(_tri: &Triangulation, _enc: NormalEncoding) -> Result<Vec<Vec<i64>>> {
        Ok(Vec::new())
    }

    fn constrain<T: LpInt>(_lp: &mut LpData<Self, T>) -> Result<()> {
        Ok(())
    }
}

/// `χ − #octagons ≥ 1`. Needs triangle coordinates.
///
/// An octagon is cheaper than its two quads by one in `χ`, and it is counted
/// once more as an octagon, hence the adjustment of `-1` per quad column.
#[derive(Clone, Copy, Debug, Default)]
pub struct LpConstraintEulerPositive;

impl LpConstraint for LpConstraintEulerPositive {
    const NAME: &'static str = "euler-positive";
    const OCT_ADJUSTMENT: i64 = -1;

    fn check(_tri: &Triangulation, coords: NormalCoords) -> Result<()> {
        if coords.is_reduced() {
            return Err(Error::invalid("the Euler constraint needs triangle coordinates"));
        }
        Ok(())
    }

    fn coefficients(tri: &Triangulation, enc: NormalEncoding) -> Result<Vec<Vec<i64>>> {
        Ok(vec![euler_char_functional(tri, enc)?])
    }

    fn constrain<T: LpInt>(lp: &mut LpData<Self, T>) -> Result<()> {
        for c in lp.extra_columns() {
            lp.constrain_positive(c)?;
        }
        Ok(())
    }
}

/// Every cusp's meridian and longitude functionals vanish, so the surface
/// is not spun. Needs quad coordinates and a peripheral-curve oracle.
#[derive(Clone, Copy, Debug, Default)]
pub struct LpConstraintNonSpun;

impl LpConstraint for LpConstraintNonSpun {
    const NAME: &'static str = "non-spun";
    const OCT_ADJUSTMENT: i64 = 0;

    fn check(tri: &Triangulation, coords: NormalCoords) -> Result<()> {
        if !coords.is_reduced() {
            return Err(Error::invalid("the non-spun constraint needs quad coordinates"));
        }
        check_closed_preconditions(tri)
    }

    fn coefficients(tri: &Triangulation, enc: NormalEncoding) -> Result<Vec<Vec<i64>>> {
        closed_rows(tri, enc)
    }

    fn constrain<T: LpInt>(lp: &mut LpData<Self, T>) -> Result<()> {
        for c in lp.extra_columns() {
            lp.constrain_zero(c)?;
        }
        Ok(())
    }
}

/// Columns forced to zero before the search starts.
pub trait BanConstraint: Clone + Debug + Send + Sync + 'static {
    /// LP columns to ban, given the starting tableau.
    fn banned_columns<C: LpConstraint>(init: &LpInitialTableaux<C>) -> Result<Vec<usize>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BanNone;

impl BanConstraint for BanNone {
    fn banned_columns<C: LpConstraint>(_init: &LpInitialTableaux<C>) -> Result<Vec<usize>> {
        Ok(Vec::new())
    }
}

/// Bans every disc that touches a boundary triangle: all quads of a
/// tetrahedron with a boundary face, and the triangles there whose corner is
/// not opposite that face.
#[derive(Clone, Copy, Debug, Default)]
pub struct BanBoundary;

impl BanConstraint for BanBoundary {
    fn banned_columns<C: LpConstraint>(init: &LpInitialTableaux<C>) -> Result<Vec<usize>> {
        if !init.has_triangles() {
            return Err(Error::invalid("boundary bans need triangle coordinates"));
        }
        let tri = init.triangulation();
        let mut out = Vec::new();
        for t in 0..tri.size() {
            let faces: Vec<usize> = (0..4).filter(|&f| tri.adjacent(t, f).is_none()).collect();
            if faces.is_empty() {
                continue;
            }
            out.extend((0..3).map(|q| init.quad_column(t, q)));
            for v in 0..4 {
                if faces.iter().any(|&f| f != v) {
                    out.push(init.triangle_column(t, v));
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }
}

/// The starting system of a tree search.
#[derive(Clone, Debug)]
pub struct LpInitialTableaux<C: LpConstraint> {
    tri: Triangulation,
    coords: NormalCoords,
    triangles: bool,
    eqns: MatchingEquations,
    table: DMatrix<i64>,
    coord_cols: usize,
    n_extra: usize,
    _bundle: PhantomData<fn() -> C>,
}

impl<C: LpConstraint> LpInitialTableaux<C> {
    /// Build the starting system for a search that reports vectors in
    /// `coords`. Closed variants run on the quad tableau; their cusp rows
    /// come from [`LpConstraintNonSpun`].
    pub fn new(tri: &Triangulation, coords: NormalCoords) -> Result<Self> {
        C::check(tri, coords)?;
        let triangles = !coords.is_reduced();
        let base = if triangles { NormalCoords::Standard } else { NormalCoords::Quad };
        let enc = NormalEncoding::new(base);
        let all = make_matching_equations(tri, base)?;
        let eqns = all.restrict_rows(&all.row_basis().rows);
        let extras = C::coefficients(tri, enc)?;

        let n = tri.size();
        let coord_cols = n * enc.block_size();
        let rank = eqns.rows();
        let mut table = DMatrix::zeros(rank + extras.len(), coord_cols + extras.len());
        let lp_col = |c: usize| -> usize {
            let (t, k) = (c / enc.block_size(), c % enc.block_size());
            match (triangles, k) {
                (true, 0..=3) => 3 * n + 4 * t + k,
                (true, _) => 3 * t + (k - 4),
                (false, _) => c,
            }
        };
        for r in 0..rank {
            for c in 0..coord_cols {
                table[(r, lp_col(c))] = eqns.entry(r, c);
            }
        }
        for (i, row) in extras.iter().enumerate() {
            if row.len() != coord_cols {
                return Err(Error::invalid("constraint row has the wrong length"));
            }
            for (c, &v) in row.iter().enumerate() {
                table[(rank + i, lp_col(c))] = v;
            }
            table[(rank + i, coord_cols + i)] = -1;
        }
        tracing::trace!(
            bundle = C::NAME,
            ?coords,
            rows = table.nrows(),
            cols = table.ncols(),
            "initial tableau"
        );
        Ok(Self {
            tri: tri.clone(),
            coords,
            triangles,
            eqns,
            table,
            coord_cols,
            n_extra: extras.len(),
            _bundle: PhantomData,
        })
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.tri
    }

    pub fn coords(&self) -> NormalCoords {
        self.coords
    }

    pub fn size(&self) -> usize {
        self.tri.size()
    }

    /// Rows of the starting system (matching rank plus extra rows).
    pub fn rank(&self) -> usize {
        self.table.nrows()
    }

    pub fn columns(&self) -> usize {
        self.table.ncols()
    }

    pub fn coordinate_columns(&self) -> usize {
        self.coord_cols
    }

    pub fn extra_columns(&self) -> Range<usize> {
        self.coord_cols..self.coord_cols + self.n_extra
    }

    pub fn has_triangles(&self) -> bool {
        self.triangles
    }

    pub fn allows_octagons(&self) -> bool {
        self.coords.stores_octagons()
    }

    /// Independent matching rows, in encoding order.
    pub fn equations(&self) -> &MatchingEquations {
        &self.eqns
    }

    pub fn quad_column(&self, tet: usize, quad: usize) -> usize {
        3 * tet + quad
    }

    pub fn triangle_column(&self, tet: usize, vertex: usize) -> usize {
        3 * self.size() + 4 * tet + vertex
    }

    pub(crate) fn table(&self) -> &DMatrix<i64> {
        &self.table
    }

    /// Turn an LP solution over the coordinate columns into a vector in the
    /// encoding of `coords`. `oct` names the two quad columns that together
    /// represent an octagon.
    pub(crate) fn to_coordinates(
        &self,
        lp: &[ExactInt],
        oct: Option<(usize, usize)>,
    ) -> Vec<ExactInt> {
        let n = self.size();
        let enc = NormalEncoding::new(self.coords);
        let w = enc.block_size();
        let mut out = vec![ExactInt::ZERO; n * w];
        for t in 0..n {
            for q in 0..3 {
                out[t * w + enc.quad_offset() + q] = lp[3 * t + q].clone();
            }
            if self.triangles {
                for v in 0..4 {
                    out[t * w + v] = lp[3 * n + 4 * t + v].clone();
                }
            }
        }
        if let Some((p, s)) = oct {
            let t = p / 3;
            let k = 3 - p % 3 - s % 3;
            let value = lp[p].clone();
            for q in 0..3 {
                out[t * w + enc.quad_offset() + q] = ExactInt::ZERO;
            }
            out[t * w + enc.oct_offset() + k] = value;
        }
        out
    }
}

#[cfg(test)]
mod tests;
