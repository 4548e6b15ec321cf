use std::ops::{Add, Mul};

use super::NormalSurface;
use crate::int::{scale_down, ExactInt};
use crate::{Error, Result};

/// Each tetrahedron carries at most one quad or octagon type across all of
/// `surfaces`, and at most one octagon type is used anywhere.
fn jointly_embedded(surfaces: &[&NormalSurface]) -> bool {
    let Some(first) = surfaces.first() else {
        return true;
    };
    let mut oct: Option<(usize, usize)> = None;
    for t in 0..first.triangulation().size() {
        let mut kind: Option<usize> = None;
        for s in surfaces {
            for k in 0..3 {
                let used = [(k, s.quads(t, k)), (3 + k, s.octs(t, k))];
                for (id, x) in used {
                    if x.is_zero() {
                        continue;
                    }
                    if kind.is_some_and(|c| c != id) {
                        return false;
                    }
                    kind = Some(id);
                    if id >= 3 {
                        if oct.is_some_and(|o| o != (t, k)) {
                            return false;
                        }
                        oct = Some((t, k));
                    }
                }
            }
        }
    }
    true
}

impl NormalSurface {
    /// The sum of two surfaces in the same triangulation, stored in the
    /// union of both encodings.
    pub fn sum(&self, other: &NormalSurface) -> Result<NormalSurface> {
        if self.triangulation() != other.triangulation() {
            return Err(Error::invalid("cannot add surfaces in different triangulations"));
        }
        let enc = self.encoding().union(other.encoding());
        let a = self.vector_in(enc)?;
        let b = other.vector_in(enc)?;
        let vec = a.iter().zip(&b).map(|(x, y)| x + y).collect();
        NormalSurface::new(self.triangulation(), enc, vec)
    }

    /// Twice this surface.
    pub fn double(&self) -> NormalSurface {
        self * 2
    }

    /// Divide out the gcd of the coordinates and return it.
    pub fn scale_down(&mut self) -> ExactInt {
        let g = scale_down(&mut self.vec);
        if !g.is_zero() && g != ExactInt::ONE {
            self.reset_props();
        }
        g
    }

    /// At most one quad or octagon type per tetrahedron, and octagons of a
    /// single type overall.
    pub fn is_embedded(&self) -> bool {
        jointly_embedded(&[self])
    }

    /// Whether the two surfaces could be disjoint as far as each
    /// tetrahedron alone can tell.
    pub fn locally_compatible(&self, other: &NormalSurface) -> bool {
        jointly_embedded(&[self, other])
    }

    /// Whether the surfaces can be isotoped apart.
    ///
    /// Both must be compact, embedded and connected. The test sums them and
    /// checks that the sum falls apart into exactly the two pieces.
    pub fn disjoint(&self, other: &NormalSurface) -> Result<bool> {
        if !self.is_compact() || !other.is_compact() {
            return Err(Error::precondition("disjointness needs compact surfaces"));
        }
        if !self.is_connected()? || !other.is_connected()? {
            return Err(Error::precondition("disjointness needs connected surfaces"));
        }
        if !self.locally_compatible(other) {
            return Ok(false);
        }
        let sum = self.sum(other)?;
        if sum.count_components()? != 2 {
            return Ok(false);
        }
        Ok(sum.components()?.iter().any(|c| c == self))
    }
}

impl Add for &NormalSurface {
    type Output = Result<NormalSurface>;

    fn add(self, rhs: &NormalSurface) -> Result<NormalSurface> {
        self.sum(rhs)
    }
}

impl Mul<u64> for &NormalSurface {
    type Output = NormalSurface;

    fn mul(self, k: u64) -> NormalSurface {
        let k = ExactInt::from(i128::from(k));
        let mut out = self.clone();
        for x in out.vec.iter_mut() {
            *x = &*x * &k;
        }
        out.reset_props();
        out
    }
}
