use std::collections::BTreeMap;

use super::{dominated_by, support_of};
use crate::bitmask::Bitmask;
use crate::int::ExactInt;
use crate::matching::MatchingEquations;
use crate::progress::{poll, ProgressTracker};
use crate::validity::ValidityConstraints;
use crate::Result;

/// A vector waiting to be extended: its defect `M x` and the coordinates it
/// may no longer grow in.
struct Node {
    defect: Vec<ExactInt>,
    frozen: Bitmask,
}

/// Hilbert basis by the Contejean–Devie algorithm.
///
/// Vectors grow one unit at a time, level by level. A vector `x` with defect
/// `d = M x ≠ 0` is extended by `e_i` only when `d · M e_i < 0`; vectors with
/// zero defect join the basis. Anything dominating a basis element is
/// dropped.
///
/// Components are frozen: once a node has tried growing in coordinate `i`,
/// the children it makes afterwards never grow in `i`. The unit vector `e_i`
/// starts with every coordinate below `i` frozen. A vector reached along
/// several paths keeps only the coordinates frozen on all of them.
pub fn hilbert_cd(
    eqns: &MatchingEquations,
    constraints: &ValidityConstraints,
    tracker: Option<&ProgressTracker>,
    mut sink: impl FnMut(Vec<ExactInt>),
) -> Result<()> {
    let dim = eqns.cols();
    let rows = eqns.rows();
    let masks = constraints.bitmasks(dim);
    let col = |i: usize| -> Vec<i64> { (0..rows).map(|r| eqns.entry(r, i)).collect() };
    let cols: Vec<Vec<i64>> = (0..dim).map(col).collect();

    let mut basis: Vec<Vec<ExactInt>> = Vec::new();
    let mut frontier: BTreeMap<Vec<ExactInt>, Node> = BTreeMap::new();
    for (i, c) in cols.iter().enumerate() {
        let mut v = vec![ExactInt::ZERO; dim];
        v[i] = ExactInt::ONE;
        let mut frozen = Bitmask::new(dim);
        for j in 0..i {
            frozen.set(j, true);
        }
        let defect = c.iter().map(|&a| ExactInt::from(a)).collect();
        frontier.insert(v, Node { defect, frozen });
    }

    let mut level = 1usize;
    while !frontier.is_empty() {
        let mut next: BTreeMap<Vec<ExactInt>, Node> = BTreeMap::new();
        for (x, node) in frontier {
            poll(tracker)?;
            if node.defect.iter().all(ExactInt::is_zero) {
                if !basis.iter().any(|b| dominated_by(b, &x)) {
                    basis.push(x);
                }
                continue;
            }
            let mut frozen = node.frozen;
            for (i, c) in cols.iter().enumerate() {
                if frozen.get(i) {
                    continue;
                }
                let mut dp = ExactInt::ZERO;
                for (e, &a) in node.defect.iter().zip(c) {
                    if a != 0 {
                        dp += e * a;
                    }
                }
                if !dp.is_negative() {
                    continue;
                }
                let child_frozen = frozen.clone();
                frozen.set(i, true);

                let mut y = x.clone();
                y[i] += 1;
                if basis.iter().any(|b| dominated_by(b, &y))
                    || !ValidityConstraints::allows_support(&masks, &support_of(&y))
                {
                    continue;
                }
                match next.get_mut(&y) {
                    Some(seen) => seen.frozen = seen.frozen.and(&child_frozen),
                    None => {
                        let defect = node.defect.iter().zip(c).map(|(e, &a)| e + a).collect();
                        next.insert(y, Node { defect, frozen: child_frozen });
                    }
                }
            }
        }
        tracing::trace!(level, frontier = next.len(), basis = basis.len(), "Contejean-Devie level");
        frontier = next;
        level += 1;
    }
    tracing::debug!(size = basis.len(), "Contejean-Devie Hilbert basis");
    basis.into_iter().for_each(&mut sink);
    Ok(())
}
