//! Double description: extremal rays of `{v ≥ 0 : M v = 0}` under validity.
//!
//! Method
//! - Start from the unit vectors of the non-negative orthant.
//! - For each row `h` of `M` (in row order) split the rays by the sign of
//!   `h · v`. Rays on the hyperplane survive. Each compatible
//!   positive/negative pair `(u, w)` yields `(h·u) w − (h·w) u`, reduced by
//!   its gcd.
//! - A pair is compatible if no third ray vanishes on every coordinate where
//!   both vanish (combinatorial adjacency), and the combined support obeys
//!   the validity rules.
//!
//! Rays carry their zero set as a [`Bitmask`]; the tracker is polled once
//! per hyperplane. Nothing is emitted unless the run completes.

use crate::bitmask::Bitmask;
use crate::int::{scale_down, ExactInt};
use crate::matching::MatchingEquations;
use crate::progress::{poll, ProgressTracker};
use crate::validity::ValidityConstraints;
use crate::Result;

#[derive(Clone, Debug)]
struct Ray {
    coords: Vec<ExactInt>,
    zeros: Bitmask,
}

impl Ray {
    fn unit(dim: usize, i: usize) -> Self {
        let mut coords = vec![ExactInt::ZERO; dim];
        coords[i] = ExactInt::ONE;
        let mut zeros = Bitmask::full(dim);
        zeros.set(i, false);
        Self { coords, zeros }
    }

    fn dot(&self, h: &[i64]) -> ExactInt {
        let mut acc = ExactInt::ZERO;
        for (x, &a) in self.coords.iter().zip(h) {
            if a != 0 && !x.is_zero() {
                acc += x * a;
            }
        }
        acc
    }
}

/// Enumerate the extremal rays of the admissible cone, passing each one
/// (as a primitive integer vector) to `sink`.
pub fn enumerate_extremal_rays(
    eqns: &MatchingEquations,
    constraints: &ValidityConstraints,
    tracker: Option<&ProgressTracker>,
    sink: impl FnMut(Vec<ExactInt>),
) -> Result<()> {
    let forced = Bitmask::new(eqns.cols());
    extremal_rays_in_face(eqns, constraints, &forced, tracker, sink)
}

/// As [`enumerate_extremal_rays`], restricted to the face where every
/// coordinate in `forced_zero` vanishes.
pub(crate) fn extremal_rays_in_face(
    eqns: &MatchingEquations,
    constraints: &ValidityConstraints,
    forced_zero: &Bitmask,
    tracker: Option<&ProgressTracker>,
    mut sink: impl FnMut(Vec<ExactInt>),
) -> Result<()> {
    let rays = DdRunner::new(eqns, constraints, forced_zero, tracker).run()?;
    for r in rays {
        sink(r.coords);
    }
    Ok(())
}

struct DdRunner<'a> {
    eqns: &'a MatchingEquations,
    masks: Vec<Bitmask>,
    dim: usize,
    rays: Vec<Ray>,
    tracker: Option<&'a ProgressTracker>,
}

impl<'a> DdRunner<'a> {
    fn new(
        eqns: &'a MatchingEquations,
        constraints: &ValidityConstraints,
        forced_zero: &Bitmask,
        tracker: Option<&'a ProgressTracker>,
    ) -> Self {
        let dim = eqns.cols();
        let rays = (0..dim)
            .filter(|&i| !forced_zero.get(i))
            .map(|i| Ray::unit(dim, i))
            .collect();
        Self {
            eqns,
            masks: constraints.bitmasks(dim),
            dim,
            rays,
            tracker,
        }
    }

    fn run(mut self) -> Result<Vec<Ray>> {
        for r in 0..self.eqns.rows() {
            poll(self.tracker)?;
            let h = self.eqns.row(r);
            self.cut(&h);
            tracing::trace!(hyperplane = r, rays = self.rays.len(), "double description");
            if self.rays.is_empty() {
                break;
            }
        }
        poll(self.tracker)?;
        Ok(self.rays)
    }

    fn cut(&mut self, h: &[i64]) {
        let mut zero = Vec::new();
        let mut pos = Vec::new();
        let mut neg = Vec::new();
        for ray in self.rays.drain(..) {
            let d = ray.dot(h);
            match d.signum() {
                0 => zero.push(ray),
                1 => pos.push((ray, d)),
                _ => neg.push((ray, d)),
            }
        }
        let mut next = zero.clone();
        for (u, du) in &pos {
            for (w, dw) in &neg {
                let common = u.zeros.and(&w.zeros);
                if !self.admissible(&common) {
                    continue;
                }
                if !self.adjacent(&common, u, w, &zero, &pos, &neg) {
                    continue;
                }
                let mut coords: Vec<ExactInt> = u
                    .coords
                    .iter()
                    .zip(&w.coords)
                    .map(|(a, b)| b * du - a * dw)
                    .collect();
                scale_down(&mut coords);
                let mut zeros = Bitmask::new(self.dim);
                for (i, x) in coords.iter().enumerate() {
                    if x.is_zero() {
                        zeros.set(i, true);
                    }
                }
                next.push(Ray { coords, zeros });
            }
        }
        self.rays = next;
    }

    /// The support (complement of `zeros`) obeys every validity rule.
    fn admissible(&self, zeros: &Bitmask) -> bool {
        ValidityConstraints::allows_support(&self.masks, &zeros.complement())
    }

    fn adjacent(
        &self,
        common: &Bitmask,
        u: &Ray,
        w: &Ray,
        zero: &[Ray],
        pos: &[(Ray, ExactInt)],
        neg: &[(Ray, ExactInt)],
    ) -> bool {
        let others = zero
            .iter()
            .chain(pos.iter().map(|(r, _)| r))
            .chain(neg.iter().map(|(r, _)| r));
        for r in others {
            if std::ptr::eq(r, u) || std::ptr::eq(r, w) {
                continue;
            }
            if common.is_subset_of(&r.zeros) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests;
