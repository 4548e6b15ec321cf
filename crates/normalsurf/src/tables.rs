//! Combinatorial tables for a single tetrahedron and its normal discs.
//!
//! Conventions
//! - Edges are numbered 01, 02, 03, 12, 13, 23; edge `5-i` is opposite edge `i`.
//! - Quad type `q` separates the vertex pairs of `QUAD_DEFN[q]`:
//!   {0,1 | 2,3}, {0,2 | 1,3}, {0,3 | 1,2}. Its side-0 is `{0, q+1}`.
//! - Octagon type `k` separates the same pairs as quad type `k`; it meets
//!   edges `k` and `5-k` twice and every other edge once.

/// Endpoints of each edge.
pub const EDGE_VERTEX: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Edge joining two distinct vertices; the diagonal is unused.
pub const EDGE_NUMBER: [[usize; 4]; 4] = [
    [usize::MAX, 0, 1, 2],
    [0, usize::MAX, 3, 4],
    [1, 3, usize::MAX, 5],
    [2, 4, 5, usize::MAX],
];

/// Quad type that keeps vertices `i` and `j` on the same side (so separates
/// edge `ij` from its opposite edge); -1 on the diagonal.
pub const QUAD_SEPARATING: [[i8; 4]; 4] =
    [[-1, 0, 1, 2], [0, -1, 2, 1], [1, 2, -1, 0], [2, 1, 0, -1]];

/// The two quad types meeting the edge `ij`; [-1,-1] on the diagonal.
pub const QUAD_MEETING: [[[i8; 2]; 4]; 4] = [
    [[-1, -1], [1, 2], [0, 2], [0, 1]],
    [[1, 2], [-1, -1], [0, 1], [0, 2]],
    [[0, 2], [0, 1], [-1, -1], [1, 2]],
    [[0, 1], [0, 2], [1, 2], [-1, -1]],
];

/// Vertices of each quad type, split as `{q[0], q[1]} | {q[2], q[3]}`.
pub const QUAD_DEFN: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// `QUAD_PARTNER[q][v]` is the vertex on the same side of quad `q` as `v`.
pub const QUAD_PARTNER: [[usize; 4]; 3] = [[1, 0, 3, 2], [2, 3, 0, 1], [3, 2, 1, 0]];

/// Quad type keeping `i` and `j` together, as an index (`i != j`).
#[inline]
pub fn quad_sep(i: usize, j: usize) -> usize {
    debug_assert!(i != j);
    QUAD_SEPARATING[i][j] as usize
}

/// Edge number of the edge with endpoints `i != j`.
#[inline]
pub fn edge_number(i: usize, j: usize) -> usize {
    EDGE_NUMBER[i][j]
}

/// Vertices of each face in increasing order; face `f` omits vertex `f`.
pub const TRIANGLE_VERTEX: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

/// The vertices of face `f` in increasing order.
#[inline]
pub fn face_vertices(f: usize) -> [usize; 3] {
    TRIANGLE_VERTEX[f]
}

/// Number of times an octagon of type `k` crosses edge `e`.
#[inline]
pub fn oct_edge_weight(k: usize, e: usize) -> i64 {
    if e == k || e == 5 - k {
        2
    } else {
        1
    }
}

/// Whether vertex `v` lies on side-0 of quad (or octagon) type `q`.
#[inline]
pub fn on_side_zero(q: usize, v: usize) -> bool {
    v == 0 || v == q + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_consistent() {
        for (e, ends) in EDGE_VERTEX.iter().enumerate() {
            assert_eq!(edge_number(ends[0], ends[1]), e);
            assert_eq!(edge_number(ends[1], ends[0]), e);
            let opp = EDGE_VERTEX[5 - e];
            assert!(!opp.contains(&ends[0]) && !opp.contains(&ends[1]));
        }
        for q in 0..3 {
            let d = QUAD_DEFN[q];
            assert_eq!(quad_sep(d[0], d[1]), q);
            assert_eq!(quad_sep(d[2], d[3]), q);
            assert_eq!(QUAD_PARTNER[q][d[0]], d[1]);
            assert!(on_side_zero(q, d[1]));
            assert!(!on_side_zero(q, d[2]));
            // An octagon has eight corners; it crosses twice the edges its quad misses.
            assert_eq!((0..6).map(|e| oct_edge_weight(q, e)).sum::<i64>(), 8);
            for (e, ends) in EDGE_VERTEX.iter().enumerate() {
                assert_eq!(oct_edge_weight(q, e) == 2, quad_sep(ends[0], ends[1]) == q);
            }
        }
        for i in 0..4 {
            for j in 0..4 {
                if i == j {
                    continue;
                }
                // The two quads meeting edge ij are exactly those separating i from j.
                let m = QUAD_MEETING[i][j];
                for q in 0..3 {
                    let separates = QUAD_PARTNER[q][i] != j;
                    assert_eq!(separates, m.contains(&(q as i8)));
                }
            }
        }
    }
}
