//! Fixed-length bitsets over coordinate positions.
//!
//! Used for zero sets of rays (double description, reduced→standard
//! conversion) and for support-based validity checks.

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bitmask {
    len: usize,
    words: Vec<u64>,
}

impl Bitmask {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(64)],
        }
    }

    pub fn full(len: usize) -> Self {
        let mut b = Self::new(len);
        for i in 0..len {
            b.set(i, true);
        }
        b
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, i: usize, v: bool) {
        let m = 1u64 << (i % 64);
        if v {
            self.words[i / 64] |= m;
        } else {
            self.words[i / 64] &= !m;
        }
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn and(&self, o: &Self) -> Self {
        Self {
            len: self.len,
            words: self.words.iter().zip(&o.words).map(|(a, b)| a & b).collect(),
        }
    }

    pub fn or(&self, o: &Self) -> Self {
        Self {
            len: self.len,
            words: self.words.iter().zip(&o.words).map(|(a, b)| a | b).collect(),
        }
    }

    pub fn and_not(&self, o: &Self) -> Self {
        Self {
            len: self.len,
            words: self.words.iter().zip(&o.words).map(|(a, b)| a & !b).collect(),
        }
    }

    pub fn complement(&self) -> Self {
        let mut c = Self {
            len: self.len,
            words: self.words.iter().map(|w| !w).collect(),
        };
        let spare = c.words.len() * 64 - c.len;
        if spare > 0 {
            if let Some(last) = c.words.last_mut() {
                *last &= u64::MAX >> spare;
            }
        }
        c
    }

    /// Every bit of `self` is also set in `o`.
    pub fn is_subset_of(&self, o: &Self) -> bool {
        self.words.iter().zip(&o.words).all(|(a, b)| a & !b == 0)
    }

    /// Number of bits set in `self & o` is at most one.
    pub fn meets_at_most_once(&self, o: &Self) -> bool {
        let mut seen = false;
        for (a, b) in self.words.iter().zip(&o.words) {
            let w = a & b;
            if w == 0 {
                continue;
            }
            if seen || w & (w - 1) != 0 {
                return false;
            }
            seen = true;
        }
        true
    }

    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_and_single_meet() {
        let mut a = Bitmask::new(130);
        let mut b = Bitmask::new(130);
        a.set(3, true);
        a.set(129, true);
        b.set(3, true);
        b.set(129, true);
        b.set(70, true);
        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));
        assert_eq!(b.count(), 3);
        let mut blk = Bitmask::new(130);
        blk.set(70, true);
        blk.set(71, true);
        assert!(b.meets_at_most_once(&blk));
        blk.set(129, true);
        assert!(!b.meets_at_most_once(&blk));
        assert_eq!(a.complement().count(), 128);
        assert_eq!(b.ones().collect::<Vec<_>>(), vec![3, 70, 129]);
    }
}
