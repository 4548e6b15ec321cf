//! Choice of integer width for the tableau.
//!
//! Every tableau entry is a minor of the starting system, so the Hadamard
//! bound on those minors bounds everything the search computes. We take
//! the worst intermediate value `2 · H² · colsum · rank · rhs`, multiply by
//! the safety factor, and pick the narrowest native type that holds it.

use crate::cfg::HADAMARD_SAFETY;
use crate::encoding::NormalCoords;
use crate::int::ExactInt;
use crate::matching::make_matching_equations;
use crate::triangulation::Triangulation;
use crate::Result;

/// Integer type selected for a tree search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LpIntKind {
    I64,
    I128,
    Exact,
}

impl LpIntKind {
    pub fn name(self) -> &'static str {
        match self {
            LpIntKind::I64 => "i64",
            LpIntKind::I128 => "i128",
            LpIntKind::Exact => "exact",
        }
    }
}

/// Pick the tableau integer type for an unconstrained vertex search in
/// `coords` on `tri`.
///
/// Closed variants carry cusp rows whose size is not bounded here, so they
/// always run exactly.
pub fn choose_int(tri: &Triangulation, coords: NormalCoords) -> Result<LpIntKind> {
    let n = tri.size();
    let (base, max_cols_rhs) = match coords {
        NormalCoords::Standard => (NormalCoords::Standard, 5 * n),
        NormalCoords::Quad => (NormalCoords::Quad, n),
        NormalCoords::AlmostNormal => (NormalCoords::Standard, 5 * n + 1),
        NormalCoords::QuadOct => (NormalCoords::Quad, n + 1),
        NormalCoords::QuadClosed | NormalCoords::QuadOctClosed => return Ok(LpIntKind::Exact),
    };
    let all = make_matching_equations(tri, base)?;
    let eqns = all.restrict_rows(&all.row_basis().rows);
    let rank = eqns.rows();
    let cols = eqns.cols();

    let mut max_entry = 0i64;
    let mut max_col_sum = ExactInt::ZERO;
    let mut norms = Vec::with_capacity(cols);
    for c in 0..cols {
        let mut sum = ExactInt::ZERO;
        let mut norm = ExactInt::ZERO;
        for r in 0..rank {
            let e = eqns.entry(r, c);
            max_entry = max_entry.max(e.abs());
            sum += e.abs();
            norm += ExactInt::from(e) * e;
        }
        max_col_sum = max_col_sum.max(sum);
        norms.push(norm);
    }
    if coords.stores_octagons() {
        max_col_sum = max_col_sum * 2;
    }
    let max_rhs = ExactInt::from(max_entry) * ExactInt::from(max_cols_rhs);

    norms.sort();
    let mut hadamard_sq = ExactInt::ONE;
    for norm in norms.iter().rev().take(rank) {
        hadamard_sq = hadamard_sq * norm;
    }
    if coords.stores_octagons() {
        hadamard_sq = hadamard_sq * 4;
    }

    let worst = hadamard_sq * 2 * &max_col_sum * ExactInt::from(rank) * &max_rhs * HADAMARD_SAFETY;
    let kind = if worst <= ExactInt::from(i64::MAX) {
        LpIntKind::I64
    } else if worst <= ExactInt::from(i128::MAX) {
        LpIntKind::I128
    } else {
        LpIntKind::Exact
    };
    tracing::debug!(?coords, rank, kind = kind.name(), "tableau integer type");
    Ok(kind)
}
