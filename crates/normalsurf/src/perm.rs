//! Permutations of {0,1,2,3}, the labels of tetrahedron vertices.
//!
//! Composition follows the functional convention: `(p * q)[i] == p[q[i]]`.

use std::fmt;
use std::ops::{Index, Mul};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Perm4([u8; 4]);

/// SnapPea's `permutation_by_index` table: image of `i` is `(code >> 2i) & 3`.
const SNAPPEA_CODES: [u8; 24] = [
    0x1B, 0x1E, 0x27, 0x2D, 0x36, 0x39, 0x4B, 0x4E, 0x63, 0x6C, 0x72, 0x78, 0x87, 0x8D, 0x93,
    0x9C, 0xB1, 0xB4, 0xC6, 0xC9, 0xD2, 0xD8, 0xE1, 0xE4,
];

const FACTORIAL: [usize; 4] = [1, 1, 2, 6];

impl Perm4 {
    pub const IDENTITY: Perm4 = Perm4([0, 1, 2, 3]);

    /// Build from images without checking; see [`Perm4::from_images`].
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Perm4([a, b, c, d])
    }

    pub fn from_images(img: [u8; 4]) -> Option<Self> {
        let mut seen = [false; 4];
        for &x in &img {
            if x > 3 || seen[x as usize] {
                return None;
            }
            seen[x as usize] = true;
        }
        Some(Perm4(img))
    }

    /// The transposition swapping `a` and `b` (identity if equal).
    pub fn transposition(a: usize, b: usize) -> Self {
        let mut img = [0u8, 1, 2, 3];
        img.swap(a, b);
        Perm4(img)
    }

    pub fn images(self) -> [u8; 4] {
        self.0
    }

    #[inline]
    pub fn apply(self, i: usize) -> usize {
        self.0[i] as usize
    }

    /// Preimage of `i`.
    pub fn pre(self, i: usize) -> usize {
        self.0.iter().position(|&x| x as usize == i).unwrap_or(i)
    }

    pub fn inverse(self) -> Self {
        let mut img = [0u8; 4];
        for (i, &x) in self.0.iter().enumerate() {
            img[x as usize] = i as u8;
        }
        Perm4(img)
    }

    pub fn sign(self) -> i32 {
        let mut inv = 0;
        for i in 0..4 {
            for j in i + 1..4 {
                if self.0[i] > self.0[j] {
                    inv += 1;
                }
            }
        }
        if inv % 2 == 0 {
            1
        } else {
            -1
        }
    }

    pub fn is_even(self) -> bool {
        self.sign() == 1
    }

    /// Index in the lexicographic ordering of all 24 permutations.
    pub fn ordered_index(self) -> usize {
        let mut idx = 0;
        for i in 0..4 {
            let smaller = (i + 1..4).filter(|&j| self.0[j] < self.0[i]).count();
            idx += smaller * FACTORIAL[3 - i];
        }
        idx
    }

    pub fn from_ordered_index(mut idx: usize) -> Option<Self> {
        if idx >= 24 {
            return None;
        }
        let mut avail: Vec<u8> = vec![0, 1, 2, 3];
        let mut img = [0u8; 4];
        for (i, slot) in img.iter_mut().enumerate() {
            let f = FACTORIAL[3 - i];
            *slot = avail.remove(idx / f);
            idx %= f;
        }
        Some(Perm4(img))
    }

    /// Permutation number `idx` of SnapPea's table.
    pub fn from_snappea_index(idx: usize) -> Option<Self> {
        let code = *SNAPPEA_CODES.get(idx)?;
        let img = [code & 3, (code >> 2) & 3, (code >> 4) & 3, (code >> 6) & 3];
        Perm4::from_images(img)
    }

    pub fn all() -> impl Iterator<Item = Perm4> {
        (0..24).filter_map(Perm4::from_ordered_index)
    }
}

impl Default for Perm4 {
    fn default() -> Self {
        Perm4::IDENTITY
    }
}

impl Mul for Perm4 {
    type Output = Perm4;
    fn mul(self, rhs: Perm4) -> Perm4 {
        Perm4([
            self.0[rhs.0[0] as usize],
            self.0[rhs.0[1] as usize],
            self.0[rhs.0[2] as usize],
            self.0[rhs.0[3] as usize],
        ])
    }
}

impl Index<usize> for Perm4 {
    type Output = u8;
    fn index(&self, i: usize) -> &u8 {
        &self.0[i]
    }
}

impl fmt::Debug for Perm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl fmt::Display for Perm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_index_roundtrip_is_lexicographic() {
        let all: Vec<Perm4> = Perm4::all().collect();
        assert_eq!(all.len(), 24);
        assert_eq!(all[0], Perm4::IDENTITY);
        assert_eq!(all[23], Perm4::new(3, 2, 1, 0));
        for w in all.windows(2) {
            assert!(w[0] < w[1]);
        }
        for (i, p) in all.iter().enumerate() {
            assert_eq!(p.ordered_index(), i);
        }
    }

    #[test]
    fn compose_inverse_sign() {
        let p = Perm4::new(1, 2, 0, 3);
        let q = Perm4::transposition(0, 3);
        assert_eq!((p * q).apply(0), p.apply(3));
        assert_eq!(p * p.inverse(), Perm4::IDENTITY);
        assert_eq!(p.sign(), 1);
        assert_eq!(q.sign(), -1);
        assert_eq!((p * q).sign(), -1);
        assert_eq!(p.pre(2), 1);
    }

    #[test]
    fn snappea_table_covers_s4() {
        let mut seen: Vec<Perm4> = (0..24).filter_map(Perm4::from_snappea_index).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 24);
        assert_eq!(Perm4::from_snappea_index(0), Some(Perm4::new(3, 2, 1, 0)));
        assert_eq!(Perm4::from_snappea_index(23), Some(Perm4::IDENTITY));
    }
}
