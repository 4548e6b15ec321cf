//! Decoding of Callahan–Hildebrand–Weeks dehydration strings.
//!
//! Layout, all lower-case letters with `a = 0`:
//! - the number of tetrahedra `n` (at most 25);
//! - `2 * ceil(n / 4)` letters: one bit per gluing (of `2n`), read in
//!   letter pairs as `16 * hi + lo` with the least significant bit first; a
//!   set bit glues the current face to the next new tetrahedron by the identity;
//! - `n + 1` destination letters and `n + 1` permutation letters for the
//!   remaining gluings, the latter indexing SnapPea's permutation table.
//!
//! Faces are visited in order `(tet, face)`, skipping faces already glued.

use super::Triangulation;
use crate::perm::Perm4;
use crate::{Error, Result};

fn val(c: u8) -> Result<usize> {
    if c.is_ascii_lowercase() {
        Ok((c - b'a') as usize)
    } else {
        Err(Error::invalid(format!("dehydration: invalid character {:?}", c as char)))
    }
}

impl Triangulation {
    /// Build a triangulation without boundary triangles from its dehydration
    /// string.
    pub fn rehydrate(s: &str) -> Result<Triangulation> {
        let bytes: Vec<u8> = s.trim().bytes().map(|b| b.to_ascii_lowercase()).collect();
        let first = *bytes.first().ok_or_else(|| Error::invalid("dehydration: empty string"))?;
        let n = val(first)?;
        if n == 0 {
            return Ok(Triangulation::new());
        }
        let new_len = 2 * n.div_ceil(4);
        if bytes.len() != 1 + new_len + 2 * (n + 1) {
            return Err(Error::invalid(format!(
                "dehydration: expected {} characters for {n} tetrahedra",
                1 + new_len + 2 * (n + 1)
            )));
        }

        let mut new_bits = Vec::with_capacity(4 * new_len);
        for pair in bytes[1..1 + new_len].chunks(2) {
            let byte = 16 * val(pair[0])? + val(pair[1])?;
            new_bits.extend((0..8).map(|j| (byte >> j) & 1 == 1));
        }
        let dest = &bytes[1 + new_len..1 + new_len + n + 1];
        let perms = &bytes[1 + new_len + n + 1..];

        let mut tri = Triangulation::with_size(n);
        let mut gluing = 0;
        let mut next_new = 1;
        let mut other = 0;
        for t in 0..n {
            for f in 0..4 {
                if tri.adjacent(t, f).is_some() {
                    continue;
                }
                if gluing >= 2 * n {
                    return Err(Error::invalid("dehydration: too few gluings"));
                }
                if new_bits[gluing] {
                    if next_new >= n {
                        return Err(Error::invalid("dehydration: too many new tetrahedra"));
                    }
                    tri.join(t, f, next_new, Perm4::IDENTITY)?;
                    next_new += 1;
                } else {
                    if other > n {
                        return Err(Error::invalid("dehydration: too many gluings"));
                    }
                    let d = val(dest[other])?;
                    let g = Perm4::from_snappea_index(val(perms[other])?)
                        .ok_or_else(|| Error::invalid("dehydration: invalid permutation"))?;
                    if d >= next_new {
                        return Err(Error::invalid(
                            "dehydration: gluing to an unreached tetrahedron",
                        ));
                    }
                    tri.join(t, f, d, g)?;
                    other += 1;
                }
                gluing += 1;
            }
        }
        if other != n + 1 || next_new != n {
            return Err(Error::invalid("dehydration: gluing data does not match size"));
        }
        Ok(tri)
    }
}
