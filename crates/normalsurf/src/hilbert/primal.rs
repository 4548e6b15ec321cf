use std::collections::BTreeSet;

use super::{support_of, Completion};
use crate::bitmask::Bitmask;
use crate::encoding::NormalEncoding;
use crate::int::ExactInt;
use crate::matching::MatchingEquations;
use crate::progress::{poll, ProgressTracker};
use crate::validity::ValidityConstraints;
use crate::{Error, Result};

/// Read-only view of vertex vectors in a narrower encoding.
///
/// Vertex surfaces are often stored with reconstructed triangles while the
/// primal engine works in the reduced system; the view drops the extra
/// columns on the fly without copying the list.
#[derive(Clone, Debug)]
pub struct ShadowRays<'a> {
    rays: Vec<&'a [ExactInt]>,
    from: NormalEncoding,
    to: NormalEncoding,
}

impl<'a> ShadowRays<'a> {
    /// Fails if `to` needs triangles that `from` does not store, or if a
    /// vector does not have `n` blocks of `from`.
    pub fn new<I>(rays: I, n: usize, from: NormalEncoding, to: NormalEncoding) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [ExactInt]>,
    {
        if to.stores_triangles() && !from.stores_triangles() {
            return Err(Error::invalid("shadow view cannot add triangle coordinates"));
        }
        let rays: Vec<&'a [ExactInt]> = rays.into_iter().collect();
        if let Some(bad) = rays.iter().find(|r| r.len() != n * from.block_size()) {
            return Err(Error::invalid(format!(
                "shadow view: vector of length {} is not {n} blocks of {}",
                bad.len(),
                from.block_size()
            )));
        }
        Ok(Self { rays, from, to })
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Ray `i` in the target encoding.
    pub fn get(&self, i: usize) -> Vec<ExactInt> {
        let src = self.rays[i];
        let (fw, tw) = (self.from.block_size(), self.to.block_size());
        let n = if fw == 0 { 0 } else { src.len() / fw };
        let mut out = Vec::with_capacity(n * tw);
        for block in src.chunks(fw.max(1)).take(n) {
            if self.to.stores_triangles() {
                out.extend_from_slice(&block[..4]);
            }
            let q = self.from.quad_offset();
            out.extend_from_slice(&block[q..q + 3]);
            if self.to.stores_octagons() {
                if self.from.stores_octagons() {
                    let o = self.from.oct_offset();
                    out.extend_from_slice(&block[o..o + 3]);
                } else {
                    out.extend(std::iter::repeat(ExactInt::ZERO).take(3));
                }
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec<ExactInt>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// Maximal sets of pairwise compatible rays (Bron–Kerbosch).
///
/// The validity rules only forbid two non-zero entries in one block, so a
/// set of rays is admissible exactly when every pair is.
pub(crate) fn maximal_faces(supports: &[Bitmask], masks: &[Bitmask]) -> Vec<Vec<usize>> {
    let n = supports.len();
    let compatible: Vec<Vec<bool>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| ValidityConstraints::allows_support(masks, &supports[i].or(&supports[j])))
                .collect()
        })
        .collect();
    let mut out = Vec::new();
    let mut r = Vec::new();
    bron_kerbosch(&compatible, &mut r, (0..n).collect(), Vec::new(), &mut out);
    out
}

fn bron_kerbosch(
    adj: &[Vec<bool>],
    r: &mut Vec<usize>,
    p: Vec<usize>,
    mut x: Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if p.is_empty() {
        if x.is_empty() && !r.is_empty() {
            out.push(r.clone());
        }
        return;
    }
    let mut p = p;
    while let Some(v) = p.pop() {
        let np = p.iter().copied().filter(|&u| adj[v][u]).collect();
        let nx = x.iter().copied().filter(|&u| adj[v][u]).collect();
        r.push(v);
        bron_kerbosch(adj, r, np, nx, out);
        r.pop();
        x.push(v);
    }
}

/// Hilbert basis from the vertex rays of the admissible cone.
///
/// `rays` must hold every extremal ray of the admissible cone of `eqns`,
/// in the encoding of `eqns`.
pub fn hilbert_primal(
    eqns: &MatchingEquations,
    constraints: &ValidityConstraints,
    rays: &ShadowRays<'_>,
    tracker: Option<&ProgressTracker>,
    mut sink: impl FnMut(Vec<ExactInt>),
) -> Result<()> {
    let dim = eqns.cols();
    let vecs: Vec<Vec<ExactInt>> = rays.iter().collect();
    if let Some(bad) = vecs.iter().find(|v| v.len() != dim) {
        return Err(Error::invalid(format!(
            "primal Hilbert basis: ray of length {} for {dim} columns",
            bad.len()
        )));
    }
    let masks = constraints.bitmasks(dim);
    let supports: Vec<Bitmask> = vecs.iter().map(|v| support_of(v)).collect();
    let faces = maximal_faces(&supports, &masks);
    tracing::debug!(rays = vecs.len(), faces = faces.len(), "primal Hilbert basis");

    let mut found: BTreeSet<Vec<ExactInt>> = BTreeSet::new();
    for face in &faces {
        poll(tracker)?;
        let mut columns = Bitmask::new(dim);
        let mut bound = vec![ExactInt::ZERO; dim];
        for &i in face {
            columns = columns.or(&supports[i]);
            for (b, x) in bound.iter_mut().zip(&vecs[i]) {
                *b += x;
            }
        }
        let completion = Completion::new(eqns, Vec::new(), Some(bound));
        found.extend(completion.run(&columns, tracker)?);
    }
    found.into_iter().for_each(&mut sink);
    Ok(())
}
