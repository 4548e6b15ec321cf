//! Union-find with an optional parity bit per element (internal).
//!
//! The parity form answers "are these two pieces glued with a flip?" and is
//! shared by the skeleton (orientation of tetrahedra and vertex links) and the
//! surface topology queries (orientability, two-sidedness).

#[derive(Clone, Debug)]
pub(crate) struct ParityDsu {
    parent: Vec<usize>,
    // Parity relative to parent.
    parity: Vec<bool>,
    rank: Vec<u8>,
    /// Set once a union closes a cycle with odd total parity.
    pub(crate) conflict: bool,
}

impl ParityDsu {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            parity: vec![false; n],
            rank: vec![0; n],
            conflict: false,
        }
    }

    /// Root and parity of `x` relative to the root.
    pub(crate) fn find(&mut self, x: usize) -> (usize, bool) {
        let mut path = Vec::new();
        let mut cur = x;
        while self.parent[cur] != cur {
            path.push(cur);
            cur = self.parent[cur];
        }
        let root = cur;
        // Compress from the top so each parity is relative to the root.
        for &node in path.iter().rev() {
            let p = self.parent[node];
            if p != root {
                self.parity[node] ^= self.parity[p];
            }
            self.parent[node] = root;
        }
        (root, self.parity[x] && x != root)
    }

    /// Record that `a` and `b` differ by `flip`.
    pub(crate) fn union(&mut self, a: usize, b: usize, flip: bool) {
        let (ra, pa) = self.find(a);
        let (rb, pb) = self.find(b);
        if ra == rb {
            if pa ^ pb != flip {
                self.conflict = true;
            }
            return;
        }
        let rel = pa ^ pb ^ flip;
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb;
            self.parity[ra] = rel;
        } else {
            self.parent[rb] = ra;
            self.parity[rb] = rel;
            if self.rank[ra] == self.rank[rb] {
                self.rank[ra] += 1;
            }
        }
    }

    /// Dense component labels `0..k` in order of first appearance, and `k`.
    pub(crate) fn labels(&mut self) -> (Vec<usize>, usize) {
        let n = self.parent.len();
        let mut label = vec![usize::MAX; n];
        let mut out = vec![0; n];
        let mut k = 0;
        for (x, slot) in out.iter_mut().enumerate() {
            let r = self.find(x).0;
            if label[r] == usize::MAX {
                label[r] = k;
                k += 1;
            }
            *slot = label[r];
        }
        (out, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_cycle_conflicts() {
        let mut d = ParityDsu::new(3);
        d.union(0, 1, true);
        d.union(1, 2, true);
        assert!(!d.conflict);
        assert_eq!(d.find(2).1, d.find(0).1);
        d.union(2, 0, true);
        assert!(d.conflict);
        assert_eq!(d.find(0).0, d.find(2).0);
        assert_eq!(d.labels().1, 1);
    }
}
