//! "At most one non-zero coordinate" rules.
//!
//! A rule is a pattern of offsets within a tetrahedron block. Local
//! patterns apply to each block separately; global patterns apply to the
//! union of that pattern across every block (used for "at most one
//! octagon anywhere").

use crate::bitmask::Bitmask;
use crate::encoding::NormalEncoding;
use crate::int::ExactInt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidityConstraints {
    block: usize,
    n_blocks: usize,
    local: Vec<Vec<usize>>,
    global: Vec<Vec<usize>>,
}

impl ValidityConstraints {
    /// No constraints at all (immersed and singular surfaces).
    pub fn none() -> Self {
        Self::default()
    }

    /// Quadrilateral constraints for `enc` on `n` tetrahedra: quads (and
    /// octagons) per tetrahedron, plus one global octagon rule.
    pub fn for_encoding(enc: NormalEncoding, n: usize) -> Self {
        let q = enc.quad_offset();
        let mut local: Vec<usize> = (q..q + 3).collect();
        let mut global = Vec::new();
        if enc.stores_octagons() {
            let o = enc.oct_offset();
            local.extend(o..o + 3);
            global.push((o..o + 3).collect());
        }
        Self {
            block: enc.block_size(),
            n_blocks: n,
            local: vec![local],
            global,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.global.is_empty()
    }

    /// One mask per rule, over vectors of length `len`.
    pub fn bitmasks(&self, len: usize) -> Vec<Bitmask> {
        let mut out = Vec::new();
        for pat in &self.local {
            for b in 0..self.n_blocks {
                let mut m = Bitmask::new(len);
                for &o in pat {
                    m.set(b * self.block + o, true);
                }
                out.push(m);
            }
        }
        for pat in &self.global {
            let mut m = Bitmask::new(len);
            for b in 0..self.n_blocks {
                for &o in pat {
                    m.set(b * self.block + o, true);
                }
            }
            out.push(m);
        }
        out
    }

    /// Whether a vector with the given non-zero positions obeys every rule.
    pub fn allows_support(masks: &[Bitmask], support: &Bitmask) -> bool {
        masks.iter().all(|m| m.meets_at_most_once(support))
    }

    pub fn allows(&self, v: &[ExactInt]) -> bool {
        let mut support = Bitmask::new(v.len());
        for (i, x) in v.iter().enumerate() {
            if !x.is_zero() {
                support.set(i, true);
            }
        }
        Self::allows_support(&self.bitmasks(v.len()), &support)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::NormalCoords;
    use crate::int::exact_vec;

    #[test]
    fn smoke_quad_and_octagon_rules() {
        let q = ValidityConstraints::for_encoding(NormalEncoding::new(NormalCoords::Quad), 2);
        assert_eq!(q.bitmasks(6).len(), 2);
        assert!(q.allows(&exact_vec(&[1, 0, 0, 0, 3, 0])));
        assert!(!q.allows(&exact_vec(&[1, 1, 0, 0, 0, 0])));

        let an =
            ValidityConstraints::for_encoding(NormalEncoding::new(NormalCoords::AlmostNormal), 2);
        assert_eq!(an.bitmasks(20).len(), 3);
        let mut v = vec![0; 20];
        v[7] = 1;
        v[0] = 2;
        assert!(an.allows(&exact_vec(&v)));
        v[18] = 1;
        assert!(!an.allows(&exact_vec(&v)), "two octagons");
        v[18] = 0;
        v[5] = 1;
        assert!(!an.allows(&exact_vec(&v)), "quad and octagon together");
        assert!(ValidityConstraints::none().allows(&exact_vec(&[1, 1, 1])));
    }
}
