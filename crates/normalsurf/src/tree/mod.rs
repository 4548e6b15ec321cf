//! Tree traversal over disc types.
//!
//! Purpose
//! - [`TreeEnumeration`] lists vertex surfaces by walking a search tree whose
//!   levels choose one type per quad position (and per triangle position in
//!   standard coordinates), testing each node with the LP tableau.
//! - [`TreeSingleSoln`] stops at the first non-trivial solution and keeps
//!   some triangle coordinate at zero, so vertex links are never returned.
//!
//! Types per level
//! - Quad level `k`: `0` (no quads), `1..=3` (quad `t-1` positive, the
//!   others zero), `4..=6` (octagon `t-4`: the other two quads merged).
//!   Octagon types appear only in almost normal systems and only while no
//!   other level holds an octagon.
//! - Triangle level: `0` (zero) or `1` (positive).
//!
//! Both searches poll the tracker at every node.

mod enumeration;
mod single;

use std::collections::HashSet;

pub use enumeration::TreeEnumeration;
pub use single::TreeSingleSoln;

use crate::encoding::NormalCoords;
use crate::int::ExactInt;
use crate::lp::hadamard::LpIntKind;
use crate::lp::{BanConstraint, LpConstraint};
use crate::progress::ProgressTracker;
use crate::triangulation::Triangulation;
use crate::{Error, Result};

/// Run [`TreeEnumeration`] with tableau integers of kind `kind`.
///
/// If a native run overflows, the search restarts with [`ExactInt`] and
/// vectors already passed to `sink` are not passed again.
pub fn tree_vertices<C: LpConstraint, B: BanConstraint>(
    tri: &Triangulation,
    coords: NormalCoords,
    kind: LpIntKind,
    tracker: Option<&ProgressTracker>,
    sink: &mut dyn FnMut(Vec<ExactInt>),
) -> Result<()> {
    let mut emitted = HashSet::new();
    let first = {
        let mut record = |v: Vec<ExactInt>| {
            emitted.insert(v.clone());
            sink(v);
        };
        match kind {
            LpIntKind::I64 => {
                TreeEnumeration::<C, B, i64>::new(tri, coords)?.run(tracker, &mut record)
            }
            LpIntKind::I128 => {
                TreeEnumeration::<C, B, i128>::new(tri, coords)?.run(tracker, &mut record)
            }
            LpIntKind::Exact => {
                TreeEnumeration::<C, B, ExactInt>::new(tri, coords)?.run(tracker, &mut record)
            }
        }
    };
    match first {
        Err(Error::IntegerOverflow(op)) if kind != LpIntKind::Exact => {
            tracing::warn!(
                int = kind.name(),
                op,
                emitted = emitted.len(),
                "tree search overflowed; retrying exactly"
            );
            TreeEnumeration::<C, B, ExactInt>::new(tri, coords)?
                .with_skip(emitted)
                .run(tracker, sink)
                .map(|_| ())
        }
        other => other.map(|_| ()),
    }
}

/// Run [`TreeSingleSoln`] with tableau integers of kind `kind`, retrying
/// exactly on overflow.
pub fn tree_single<C: LpConstraint, B: BanConstraint>(
    tri: &Triangulation,
    coords: NormalCoords,
    kind: LpIntKind,
    require_octagon: bool,
    tracker: Option<&ProgressTracker>,
) -> Result<Option<Vec<ExactInt>>> {
    let first = match kind {
        LpIntKind::I64 => TreeSingleSoln::<C, B, i64>::new(tri, coords)?
            .with_octagon_required(require_octagon)
            .find(tracker),
        LpIntKind::I128 => TreeSingleSoln::<C, B, i128>::new(tri, coords)?
            .with_octagon_required(require_octagon)
            .find(tracker),
        LpIntKind::Exact => TreeSingleSoln::<C, B, ExactInt>::new(tri, coords)?
            .with_octagon_required(require_octagon)
            .find(tracker),
    };
    match first {
        Err(Error::IntegerOverflow(op)) if kind != LpIntKind::Exact => {
            tracing::warn!(
                int = kind.name(),
                op,
                "single solution search overflowed; retrying exactly"
            );
            TreeSingleSoln::<C, B, ExactInt>::new(tri, coords)?
                .with_octagon_required(require_octagon)
                .find(tracker)
        }
        other => other,
    }
}

/// Quad columns `(zeroed, first, second)` for octagon type `k` at tetrahedron
/// `tet`: octagon `k` is the sum of quads `k+1` and `k+2`.
pub(crate) fn octagon_columns(tet: usize, k: usize) -> (usize, usize, usize) {
    let q = |i: usize| 3 * tet + (k + i) % 3;
    let (a, b) = (q(1), q(2));
    (q(0), a.min(b), a.max(b))
}

#[cfg(test)]
mod tests;
