//! Hilbert bases: the minimal generating sets of integer points of the
//! admissible cone `{v ≥ 0 : M v = 0}`.
//!
//! Engines
//! - [`hilbert_dual`]: completion one hyperplane at a time, starting from the
//!   unit vectors. Sums of a positive and a negative element are kept unless
//!   some element already in the set reduces them.
//! - [`hilbert_primal`]: completion inside each maximal admissible face
//!   spanned by known vertex rays, discarding anything above the sum of the
//!   face's rays.
//! - [`hilbert_cd`]: Contejean–Devie increment search with frozen
//!   components.
//! - [`hilbert_fullcone`]: the dual engine with no validity rules, followed
//!   by a validity filter.
//!
//! Every engine returns the same set; only the order differs. Validity
//! pruning is sound because a decomposition `x = a + b` into non-negative
//! vectors never enlarges the support. Each engine polls the tracker inside
//! its main loop and emits nothing when cancelled.

mod cd;
mod primal;

use std::collections::VecDeque;

pub use cd::hilbert_cd;
pub(crate) use primal::maximal_faces;
pub use primal::{hilbert_primal, ShadowRays};

use crate::bitmask::Bitmask;
use crate::int::ExactInt;
use crate::matching::MatchingEquations;
use crate::progress::{poll, ProgressTracker};
use crate::validity::ValidityConstraints;
use crate::Result;

/// Hilbert basis by dual completion.
pub fn hilbert_dual(
    eqns: &MatchingEquations,
    constraints: &ValidityConstraints,
    tracker: Option<&ProgressTracker>,
    mut sink: impl FnMut(Vec<ExactInt>),
) -> Result<()> {
    let completion = Completion::new(eqns, constraints.bitmasks(eqns.cols()), None);
    let basis = completion.run(&Bitmask::full(eqns.cols()), tracker)?;
    tracing::debug!(size = basis.len(), "dual Hilbert basis");
    basis.into_iter().for_each(&mut sink);
    Ok(())
}

/// Hilbert basis of the whole cone, then filtered by `constraints`.
pub fn hilbert_fullcone(
    eqns: &MatchingEquations,
    constraints: &ValidityConstraints,
    tracker: Option<&ProgressTracker>,
    mut sink: impl FnMut(Vec<ExactInt>),
) -> Result<()> {
    let completion = Completion::new(eqns, Vec::new(), None);
    let basis = completion.run(&Bitmask::full(eqns.cols()), tracker)?;
    let total = basis.len();
    let kept: Vec<_> = basis.into_iter().filter(|v| constraints.allows(v)).collect();
    tracing::debug!(total, kept = kept.len(), "full cone Hilbert basis");
    kept.into_iter().for_each(&mut sink);
    Ok(())
}

/// `a ≤ b` coordinatewise.
pub(crate) fn dominated_by(a: &[ExactInt], b: &[ExactInt]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y)
}

fn support_of(v: &[ExactInt]) -> Bitmask {
    let mut s = Bitmask::new(v.len());
    for (i, x) in v.iter().enumerate() {
        if !x.is_zero() {
            s.set(i, true);
        }
    }
    s
}

/// Drop every vector that dominates another one in the list.
pub(crate) fn minimal(mut vs: Vec<Vec<ExactInt>>) -> Vec<Vec<ExactInt>> {
    vs.sort();
    vs.dedup();
    let keep: Vec<bool> = (0..vs.len())
        .map(|i| !(0..vs.len()).any(|j| j != i && dominated_by(&vs[j], &vs[i])))
        .collect();
    vs.into_iter().zip(keep).filter_map(|(v, k)| k.then_some(v)).collect()
}

struct Elem {
    v: Vec<ExactInt>,
    support: Bitmask,
    /// Value of the current hyperplane on `v`.
    h: ExactInt,
}

impl Elem {
    fn new(v: Vec<ExactInt>, row: &[i64]) -> Self {
        let h = dot(row, &v);
        Self { support: support_of(&v), v, h }
    }

    /// Whether `self` reduces a candidate `v` with hyperplane value `h`.
    fn reduces(&self, v: &[ExactInt], h: &ExactInt) -> bool {
        let sign_ok = match h.signum() {
            1 => !self.h.is_negative() && &self.h <= h,
            -1 => !self.h.is_positive() && &self.h >= h,
            _ => self.h.is_zero(),
        };
        sign_ok && dominated_by(&self.v, v)
    }
}

fn dot(row: &[i64], v: &[ExactInt]) -> ExactInt {
    let mut acc = ExactInt::ZERO;
    for (&a, x) in row.iter().zip(v) {
        if a != 0 && !x.is_zero() {
            acc += x * a;
        }
    }
    acc
}

/// Pottier-style completion shared by the dual, primal and full-cone engines.
pub(crate) struct Completion<'a> {
    eqns: &'a MatchingEquations,
    masks: Vec<Bitmask>,
    bound: Option<Vec<ExactInt>>,
}

impl<'a> Completion<'a> {
    pub(crate) fn new(
        eqns: &'a MatchingEquations,
        masks: Vec<Bitmask>,
        bound: Option<Vec<ExactInt>>,
    ) -> Self {
        Self { eqns, masks, bound }
    }

    /// Hilbert basis of the cone restricted to the coordinates in `columns`.
    pub(crate) fn run(
        &self,
        columns: &Bitmask,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Vec<Vec<ExactInt>>> {
        let dim = self.eqns.cols();
        let mut basis: Vec<Vec<ExactInt>> = columns
            .ones()
            .map(|i| {
                let mut v = vec![ExactInt::ZERO; dim];
                v[i] = ExactInt::ONE;
                v
            })
            .collect();
        for r in 0..self.eqns.rows() {
            poll(tracker)?;
            basis = self.intersect(basis, &self.eqns.row(r));
            tracing::trace!(row = r, size = basis.len(), "hyperplane completed");
        }
        Ok(basis)
    }

    fn admissible(&self, e: &Elem) -> bool {
        ValidityConstraints::allows_support(&self.masks, &e.support)
            && self.bound.as_ref().map_or(true, |b| dominated_by(&e.v, b))
    }

    /// Hilbert basis of `basis`'s cone cut by `row · v = 0`.
    fn intersect(&self, basis: Vec<Vec<ExactInt>>, row: &[i64]) -> Vec<Vec<ExactInt>> {
        let mut elems: Vec<Elem> = basis.into_iter().map(|v| Elem::new(v, row)).collect();
        let mut pos: Vec<usize> = Vec::new();
        let mut neg: Vec<usize> = Vec::new();
        for (i, e) in elems.iter().enumerate() {
            match e.h.signum() {
                1 => pos.push(i),
                -1 => neg.push(i),
                _ => {}
            }
        }
        let mut queue: VecDeque<(usize, usize)> =
            pos.iter().flat_map(|&p| neg.iter().map(move |&n| (p, n))).collect();

        while let Some((p, n)) = queue.pop_front() {
            let v: Vec<ExactInt> = elems[p].v.iter().zip(&elems[n].v).map(|(a, b)| a + b).collect();
            let cand = Elem {
                support: elems[p].support.or(&elems[n].support),
                h: &elems[p].h + &elems[n].h,
                v,
            };
            if !self.admissible(&cand) || elems.iter().any(|g| g.reduces(&cand.v, &cand.h)) {
                continue;
            }
            let idx = elems.len();
            match cand.h.signum() {
                1 => {
                    queue.extend(neg.iter().map(|&n| (idx, n)));
                    pos.push(idx);
                }
                -1 => {
                    queue.extend(pos.iter().map(|&p| (p, idx)));
                    neg.push(idx);
                }
                _ => {}
            }
            elems.push(cand);
        }
        minimal(elems.into_iter().filter(|e| e.h.is_zero()).map(|e| e.v).collect())
    }
}

#[cfg(test)]
mod tests;
