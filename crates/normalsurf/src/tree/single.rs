use std::marker::PhantomData;

use super::octagon_columns;
use crate::encoding::NormalCoords;
use crate::int::{ExactInt, LpInt};
use crate::lp::{BanConstraint, LpConstraint, LpData, LpInitialTableaux};
use crate::progress::{poll, ProgressTracker};
use crate::triangulation::Triangulation;
use crate::Result;

/// Search for a single non-trivial solution.
///
/// Differences from [`super::TreeEnumeration`]:
/// - no domination test; the first feasible leaf wins;
/// - quad types 0 and 1 are merged (`x ≥ 0` with the other two zero);
/// - in standard coordinates some triangle coordinate is held at zero:
///   triangles are tried in order, each one forced positive once its zero
///   branch is exhausted.
///
/// The result need not be a vertex of the solution cone. Leaves whose
/// solution is zero are rejected, so the search is meant for bundles that
/// keep zero out of the cone (such as `LpConstraintEulerPositive`).
#[derive(Debug)]
pub struct TreeSingleSoln<C: LpConstraint, B: BanConstraint, T: LpInt> {
    init: LpInitialTableaux<C>,
    n: usize,
    octagons: bool,
    require_octagon: bool,
    visited: u64,
    _marker: PhantomData<fn() -> (B, T)>,
}

impl<C: LpConstraint, B: BanConstraint, T: LpInt> TreeSingleSoln<C, B, T> {
    pub fn new(tri: &Triangulation, coords: NormalCoords) -> Result<Self> {
        let init = LpInitialTableaux::<C>::new(tri, coords)?;
        Ok(Self {
            n: tri.size(),
            octagons: init.allows_octagons(),
            init,
            require_octagon: false,
            visited: 0,
            _marker: PhantomData,
        })
    }

    /// Accept only solutions with an octagon (almost normal systems).
    pub fn with_octagon_required(mut self, yes: bool) -> Self {
        self.require_octagon = yes;
        self
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

    /// Find one solution, or `None` if there is none.
    pub fn find(&mut self, tracker: Option<&ProgressTracker>) -> Result<Option<Vec<ExactInt>>> {
        let root = LpData::<C, T>::init_start::<B>(&self.init)?;
        self.visited += 1;
        if !root.is_feasible() || self.n == 0 {
            return Ok(None);
        }
        if self.require_octagon && !self.octagons {
            return Ok(None);
        }
        if !self.init.has_triangles() {
            return self.quads(0, root, false, tracker);
        }
        let mut prefix = root;
        for t in 0..self.n {
            for v in 0..4 {
                let col = self.init.triangle_column(t, v);
                let mut zero = prefix.clone();
                zero.constrain_zero(col)?;
                if zero.is_feasible() {
                    if let Some(found) = self.quads(0, zero, false, tracker)? {
                        tracing::debug!(visited = self.visited, "single solution found");
                        return Ok(Some(found));
                    }
                }
                prefix.constrain_positive(col)?;
                if !prefix.is_feasible() {
                    return Ok(None);
                }
            }
        }
        Ok(None)
    }

    fn quads(
        &mut self,
        k: usize,
        mut lp: LpData<C, T>,
        oct_used: bool,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Option<Vec<ExactInt>>> {
        poll(tracker)?;
        let allow_oct = self.octagons && !oct_used;
        let mut children: Vec<(u8, LpData<C, T>)> = Vec::with_capacity(6);
        children.push((3, lp.clone()));
        if allow_oct {
            children.push((4, lp.clone()));
            children.push((5, lp.clone()));
        }
        lp.constrain_zero(3 * k + 2)?;
        children.push((2, lp.clone()));
        if allow_oct {
            children.push((6, lp.clone()));
        }
        lp.constrain_zero(3 * k + 1)?;
        children.push((1, lp));
        children.sort_by_key(|(t, _)| *t);

        for (ty, mut child) in children {
            match ty {
                1 => {}
                2 => {
                    child.constrain_zero(3 * k)?;
                    child.constrain_positive(3 * k + 1)?;
                }
                3 => {
                    child.constrain_zero(3 * k)?;
                    child.constrain_zero(3 * k + 1)?;
                    child.constrain_positive(3 * k + 2)?;
                }
                _ => {
                    let (zero, a, b) = octagon_columns(k, usize::from(ty - 4));
                    child.constrain_zero(zero)?;
                    child.constrain_oct(a, b)?;
                }
            }
            self.visited += 1;
            if !child.is_feasible() {
                continue;
            }
            let with_oct = oct_used || ty >= 4;
            if k + 1 < self.n {
                if let Some(found) = self.quads(k + 1, child, with_oct, tracker)? {
                    return Ok(Some(found));
                }
            } else if with_oct || !self.require_octagon {
                let v = child.extract_solution(&self.init)?;
                if v.iter().any(|x| !x.is_zero()) {
                    return Ok(Some(v));
                }
            }
        }
        Ok(None)
    }
}
