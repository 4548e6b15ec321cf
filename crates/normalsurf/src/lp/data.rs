//! Working tableau for the tree traversal.
//!
//! The tableau is stored explicitly as `T = R · A`, where `A` is the starting
//! system and `R` the accumulated row operations. Every basic column is a
//! positive multiple of a unit column. Rows are kept primitive (divided by
//! the gcd of their entries and right-hand side).
//!
//! Constraints are changes of variable on the current tableau:
//! - `x = 0` deactivates the column, pivoting it out of the basis first;
//! - `x ≥ 1` substitutes `x = x' + 1`, which moves the column onto the
//!   right-hand side and is undone when the solution is extracted;
//! - an octagon replaces one quad column by the sum of both and drops the
//!   other.
//! After each change the dual simplex restores a feasible basis, or marks
//! the tableau infeasible.

use std::marker::PhantomData;
use std::ops::Range;

use nalgebra::DMatrix;

use super::{BanConstraint, LpConstraint, LpInitialTableaux};
use crate::bitmask::Bitmask;
use crate::int::{scale_down, ExactInt, LpInt};
use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct LpData<C, T> {
    tab: DMatrix<T>,
    rhs: Vec<T>,
    rank: usize,
    /// Basic column of each live row.
    basis: Vec<usize>,
    basis_row: Vec<Option<usize>>,
    active: Vec<bool>,
    shifted: Vec<bool>,
    /// (primary, secondary) quad columns of the octagon, if any.
    oct: Option<(usize, usize)>,
    feasible: bool,
    extra: Range<usize>,
    oct_adjustment: i64,
    _bundle: PhantomData<fn() -> C>,
}

impl<C: LpConstraint, T: LpInt> LpData<C, T> {
    /// Start from `init`: find a basis, then apply the bundle's constraints
    /// and the bans of `B`.
    pub fn init_start<B: BanConstraint>(init: &LpInitialTableaux<C>) -> Result<Self> {
        let a = init.table();
        let (rows, cols) = (a.nrows(), a.ncols());
        let tab = DMatrix::from_fn(rows, cols, |r, c| T::from_i64(a[(r, c)]));
        let mut lp = LpData {
            tab,
            rhs: vec![T::zero(); rows],
            rank: rows,
            basis: vec![0; rows],
            basis_row: vec![None; cols],
            active: vec![true; cols],
            shifted: vec![false; cols],
            oct: None,
            feasible: true,
            extra: init.extra_columns(),
            oct_adjustment: C::OCT_ADJUSTMENT,
            _bundle: PhantomData,
        };
        lp.find_initial_basis()?;
        C::constrain(&mut lp)?;
        for c in B::banned_columns(init)? {
            lp.constrain_zero(c)?;
        }
        Ok(lp)
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Live rows of the tableau.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn extra_columns(&self) -> Range<usize> {
        self.extra.clone()
    }

    pub fn is_active(&self, col: usize) -> bool {
        self.active[col]
    }

    /// The pair of quad columns currently merged into an octagon.
    pub fn octagon(&self) -> Option<(usize, usize)> {
        self.oct
    }

    pub fn entry(&self, row: usize, col: usize) -> &T {
        &self.tab[(row, col)]
    }

    fn free(&self, col: usize) -> bool {
        self.active[col] && self.basis_row[col].is_none()
    }

    /// Largest active non-basic column whose entry in `row` passes `want`.
    fn last_free(&self, row: usize, want: impl Fn(i32) -> bool) -> Option<usize> {
        (0..self.tab.ncols())
            .rev()
            .find(|&c| self.free(c) && want(self.tab[(row, c)].signum()))
    }

    /// Add `x = 0` for column `col`.
    pub fn constrain_zero(&mut self, col: usize) -> Result<()> {
        if !self.active[col] || !self.feasible {
            return Ok(());
        }
        let mut recheck = false;
        if let Some(r) = self.basis_row[col] {
            if self.rhs[r].is_zero() {
                match self.last_free(r, |s| s != 0) {
                    Some(c) => self.pivot(r, c)?,
                    None => self.drop_row(r),
                }
            } else {
                match self.last_free(r, |s| s > 0) {
                    Some(c) => {
                        self.pivot(r, c)?;
                        recheck = true;
                    }
                    None => {
                        self.feasible = false;
                        return Ok(());
                    }
                }
            }
        }
        self.active[col] = false;
        if recheck {
            self.make_feasible()?;
        }
        Ok(())
    }

    /// Add `x ≥ 1` for column `col`.
    pub fn constrain_positive(&mut self, col: usize) -> Result<()> {
        if !self.active[col] {
            self.feasible = false;
            return Ok(());
        }
        if !self.feasible {
            return Ok(());
        }
        self.shifted[col] = true;
        match self.basis_row[col] {
            Some(r) => {
                self.rhs[r] = self.rhs[r].try_sub(&self.tab[(r, col)])?;
                if self.rhs[r].signum() < 0 {
                    self.make_feasible()?;
                }
            }
            None => {
                for r in 0..self.rank {
                    self.rhs[r] = self.rhs[r].try_sub(&self.tab[(r, col)])?;
                }
                self.make_feasible()?;
            }
        }
        Ok(())
    }

    /// Require the two quad columns of one tetrahedron to form an octagon:
    /// equal, and at least one.
    pub fn constrain_oct(&mut self, quad1: usize, quad2: usize) -> Result<()> {
        if !self.active[quad1] || !self.active[quad2] {
            self.feasible = false;
            return Ok(());
        }
        if !self.feasible {
            return Ok(());
        }
        match (self.basis_row[quad1], self.basis_row[quad2]) {
            (None, None) => {
                self.merge_octagon(quad1, quad2)?;
                self.active[quad2] = false;
                self.constrain_positive(quad1)
            }
            (None, Some(_)) => {
                self.merge_octagon(quad1, quad2)?;
                self.constrain_zero(quad2)?;
                self.constrain_positive(quad1)
            }
            (Some(_), None) => {
                self.merge_octagon(quad2, quad1)?;
                self.constrain_zero(quad1)?;
                self.constrain_positive(quad2)
            }
            (Some(row1), Some(_)) => {
                self.merge_octagon(quad1, quad2)?;
                // quad1 is still recorded as basic in row1, but its column
                // has changed; repair the basis before going on.
                let e1 = self.tab[(row1, quad1)].clone();
                if !e1.is_zero() {
                    if e1.signum() < 0 {
                        self.negate_row(row1)?;
                    }
                    let base = self.tab[(row1, quad1)].clone();
                    for r in 0..self.rank {
                        if r == row1 {
                            continue;
                        }
                        let coeff = self.tab[(r, quad1)].clone();
                        if !coeff.is_zero() {
                            self.combine_rows(r, &base, &coeff, row1)?;
                        }
                    }
                    self.make_feasible()?;
                } else if let Some(c) = self.last_free(row1, |s| s != 0) {
                    self.pivot(row1, c)?;
                    self.make_feasible()?;
                } else if !self.rhs[row1].is_zero() {
                    self.feasible = false;
                    return Ok(());
                } else {
                    self.drop_row(row1);
                }
                self.constrain_zero(quad2)?;
                self.constrain_positive(quad1)
            }
        }
    }

    /// Replace column `primary` by the octagon column built from `primary`
    /// and `secondary`, including the bundle's adjustment on its extra rows.
    fn merge_octagon(&mut self, primary: usize, secondary: usize) -> Result<()> {
        self.oct = Some((primary, secondary));
        let adj = T::from_i64(2 * self.oct_adjustment);
        for r in 0..self.rank {
            let mut v = self.tab[(r, primary)].try_add(&self.tab[(r, secondary)])?;
            if !adj.is_zero() {
                for e in self.extra.clone() {
                    // An extra column is −e_row, so R·e_row = −T[:, e].
                    v = v.try_sub(&adj.try_mul(&self.tab[(r, e)])?)?;
                }
            }
            self.tab[(r, primary)] = v;
        }
        Ok(())
    }

    /// Solution at the current basis in the encoding the search reports,
    /// scaled to a primitive integer vector.
    pub fn extract_solution(&self, init: &LpInitialTableaux<C>) -> Result<Vec<ExactInt>> {
        if !self.feasible {
            return Err(Error::precondition("cannot extract a solution from an infeasible tableau"));
        }
        let ncoord = init.coordinate_columns();
        let mut lcm = ExactInt::ONE;
        for r in 0..self.rank {
            lcm = lcm.lcm(&self.tab[(r, self.basis[r])].to_exact());
        }
        let mut v = vec![ExactInt::ZERO; ncoord];
        for r in 0..self.rank {
            let b = self.basis[r];
            if b < ncoord {
                let e = self.tab[(r, b)].to_exact();
                v[b] = (&lcm * &self.rhs[r].to_exact()).div_exact(&e);
            }
        }
        for (c, x) in v.iter_mut().enumerate() {
            if self.shifted[c] {
                *x += &lcm;
            }
        }
        if let Some((p, s)) = self.oct {
            v[s] = v[p].clone();
        }
        scale_down(&mut v);
        Ok(init.to_coordinates(&v, self.oct))
    }

    fn negate_row(&mut self, r: usize) -> Result<()> {
        for c in 0..self.tab.ncols() {
            self.tab[(r, c)] = self.tab[(r, c)].try_neg()?;
        }
        self.rhs[r] = self.rhs[r].try_neg()?;
        Ok(())
    }

    /// `row r ← base · row r − coeff · row def`, then divide by the gcd.
    fn combine_rows(&mut self, r: usize, base: &T, coeff: &T, def: usize) -> Result<()> {
        let cols = self.tab.ncols();
        let mut g = T::zero();
        for c in 0..cols {
            let v = T::cross(base, &self.tab[(r, c)], coeff, &self.tab[(def, c)])?;
            g = g.try_gcd(&v)?;
            self.tab[(r, c)] = v;
        }
        let rhs = T::cross(base, &self.rhs[r], coeff, &self.rhs[def])?;
        g = g.try_gcd(&rhs)?;
        self.rhs[r] = rhs;
        if !g.is_zero() && g != T::one() {
            for c in 0..cols {
                self.tab[(r, c)] = self.tab[(r, c)].try_div_exact(&g)?;
            }
            self.rhs[r] = self.rhs[r].try_div_exact(&g)?;
        }
        Ok(())
    }

    /// Pivot column `inc` into the basis at row `def`.
    fn pivot(&mut self, def: usize, inc: usize) -> Result<()> {
        let out = self.basis[def];
        self.basis_row[out] = None;
        self.basis_row[inc] = Some(def);
        self.basis[def] = inc;
        if self.tab[(def, inc)].signum() < 0 {
            self.negate_row(def)?;
        }
        let base = self.tab[(def, inc)].clone();
        for r in 0..self.rank {
            if r == def {
                continue;
            }
            let coeff = self.tab[(r, inc)].clone();
            if !coeff.is_zero() {
                self.combine_rows(r, &base, &coeff, def)?;
            }
        }
        Ok(())
    }

    /// Remove row `r` (whose basic column leaves the basis) from the live
    /// part of the tableau.
    fn drop_row(&mut self, r: usize) {
        let col = self.basis[r];
        self.basis_row[col] = None;
        self.rank -= 1;
        let last = self.rank;
        if r != last {
            self.tab.swap_rows(r, last);
            self.rhs.swap(r, last);
            self.basis.swap(r, last);
            self.basis_row[self.basis[r]] = Some(r);
        }
    }

    /// Gauss–Jordan elimination on the starting system; dependent rows are
    /// dropped.
    fn find_initial_basis(&mut self) -> Result<()> {
        let cols = self.tab.ncols();
        let mut row = 0;
        while row < self.rank {
            let pick = (0..cols)
                .find(|&c| self.basis_row[c].is_none() && !self.tab[(row, c)].is_zero());
            let Some(c) = pick else {
                self.rank -= 1;
                let last = self.rank;
                if row != last {
                    self.tab.swap_rows(row, last);
                    self.rhs.swap(row, last);
                }
                continue;
            };
            self.basis[row] = c;
            self.basis_row[c] = Some(row);
            if self.tab[(row, c)].signum() < 0 {
                self.negate_row(row)?;
            }
            let base = self.tab[(row, c)].clone();
            for r in 0..self.rank {
                if r == row {
                    continue;
                }
                let coeff = self.tab[(r, c)].clone();
                if !coeff.is_zero() {
                    self.combine_rows(r, &base, &coeff, row)?;
                }
            }
            row += 1;
        }
        Ok(())
    }

    /// Dual simplex until every right-hand side is non-negative.
    ///
    /// Leaves the row with the most negative `rhs / basic entry`. If the
    /// basis returns to a state seen at a power-of-two pivot count, switch to
    /// a Bland-style rule that cannot cycle.
    fn make_feasible(&mut self) -> Result<()> {
        let cols = self.tab.ncols();
        let mut current = Bitmask::new(cols);
        for r in 0..self.rank {
            current.set(self.basis[r], true);
        }
        let mut seen = current.clone();
        let mut pivots: u64 = 0;
        let mut next_snapshot: u64 = 1;
        loop {
            let mut out: Option<usize> = None;
            for r in 0..self.rank {
                if self.rhs[r].signum() >= 0 {
                    continue;
                }
                out = match out {
                    None => Some(r),
                    Some(o) => {
                        let v1 = self.rhs[r].try_mul(&self.tab[(o, self.basis[o])])?;
                        let v2 = self.rhs[o].try_mul(&self.tab[(r, self.basis[r])])?;
                        if v1 < v2 {
                            Some(r)
                        } else {
                            Some(o)
                        }
                    }
                };
            }
            let Some(out_row) = out else {
                return Ok(());
            };
            let out_col = self.basis[out_row];
            let Some(c) = self.last_free(out_row, |s| s < 0) else {
                self.feasible = false;
                return Ok(());
            };
            self.pivot(out_row, c)?;
            current.set(out_col, false);
            current.set(c, true);
            if current == seen {
                tracing::trace!(pivots, "dual simplex cycle; switching rule");
                return self.make_feasible_anti_cycling();
            }
            pivots += 1;
            if pivots == next_snapshot {
                seen = current.clone();
                next_snapshot = next_snapshot.saturating_mul(2);
            }
        }
    }

    fn make_feasible_anti_cycling(&mut self) -> Result<()> {
        loop {
            let out = (0..self.rank)
                .filter(|&r| self.rhs[r].signum() < 0)
                .max_by_key(|&r| self.basis[r]);
            let Some(out_row) = out else {
                return Ok(());
            };
            let Some(c) = self.last_free(out_row, |s| s < 0) else {
                self.feasible = false;
                return Ok(());
            };
            self.pivot(out_row, c)?;
        }
    }
}
