//! Decoding of isomorphism signatures.
//!
//! Format (per connected component, concatenated)
//! - Base-64 digits `a-z A-Z 0-9 + -`; integers are little-endian in 6-bit digits.
//! - Size: one digit, or `63` followed by a width digit and a `width`-digit integer.
//! - Facet actions, three trits per digit: 0 boundary, 1 glue to the next
//!   unused tetrahedron by the identity, 2 glue to an earlier tetrahedron.
//! - For each action 2: the destination (`width` digits), then the gluing
//!   as an index into the lexicographic listing of S4 (one digit).

use super::Triangulation;
use crate::perm::Perm4;
use crate::{Error, Result};

fn decode_digit(c: u8) -> Option<usize> {
    match c {
        b'a'..=b'z' => Some((c - b'a') as usize),
        b'A'..=b'Z' => Some((c - b'A') as usize + 26),
        b'0'..=b'9' => Some((c - b'0') as usize + 52),
        b'+' => Some(62),
        b'-' => Some(63),
        _ => None,
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn digit(&mut self) -> Result<usize> {
        let c = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| Error::invalid("isosig: incomplete signature"))?;
        self.pos += 1;
        decode_digit(c).ok_or_else(|| Error::invalid("isosig: invalid base64 character"))
    }

    fn int(&mut self, width: usize) -> Result<usize> {
        let mut v = 0usize;
        for k in 0..width {
            let d = self.digit()?;
            v = v
                .checked_add(d << (6 * k))
                .ok_or_else(|| Error::invalid("isosig: integer too large"))?;
        }
        Ok(v)
    }
}

impl Triangulation {
    /// Build a triangulation from a Regina isomorphism signature.
    ///
    /// Leading and trailing whitespace is ignored; `"a"` is the empty
    /// triangulation.
    pub fn from_iso_sig(sig: &str) -> Result<Triangulation> {
        let sig = sig.trim();
        if sig.chars().any(char::is_whitespace) {
            return Err(Error::invalid("isosig: unexpected internal whitespace"));
        }
        let mut r = Reader { bytes: sig.as_bytes(), pos: 0 };
        let mut tri = Triangulation::new();
        while !r.done() {
            let mut n = r.digit()?;
            let mut width = 1;
            if n == 63 {
                width = r.digit()?;
                n = r.int(width)?;
            }
            if n == 0 {
                continue;
            }
            decode_component(&mut r, &mut tri, n, width)?;
        }
        Ok(tri)
    }
}

fn decode_component(
    r: &mut Reader<'_>,
    tri: &mut Triangulation,
    n: usize,
    width: usize,
) -> Result<()> {
    let total = 4 * n;
    let mut actions = Vec::with_capacity(total);
    let mut facets = 0;
    let mut joins = 0;
    while facets < total {
        let d = r.digit()?;
        for k in 0..3 {
            let a = (d >> (2 * k)) & 3;
            if facets == total {
                if a != 0 {
                    return Err(Error::invalid("isosig: extraneous facet actions"));
                }
                continue;
            }
            match a {
                0 => facets += 1,
                1 => facets += 2,
                2 => {
                    facets += 2;
                    joins += 1;
                }
                _ => return Err(Error::invalid("isosig: invalid facet action")),
            }
            if facets > total {
                return Err(Error::invalid("isosig: facet actions do not match size"));
            }
            actions.push(a);
        }
    }
    let dest: Vec<usize> = (0..joins).map(|_| r.int(width)).collect::<Result<_>>()?;
    let gluing: Vec<Perm4> = (0..joins)
        .map(|_| {
            Perm4::from_ordered_index(r.digit()?)
                .ok_or_else(|| Error::invalid("isosig: invalid gluing permutation"))
        })
        .collect::<Result<_>>()?;

    let base = tri.new_tetrahedra(n);
    let mut next_unused = 1;
    let mut join_pos = 0;
    let mut acts = actions.into_iter();
    for t in 0..n {
        for f in 0..4 {
            if tri.adjacent(base + t, f).is_some() {
                continue;
            }
            match acts.next() {
                Some(0) => {}
                Some(1) => {
                    if next_unused >= n {
                        return Err(Error::invalid("isosig: gluing to non-existent tetrahedron"));
                    }
                    tri.join(base + t, f, base + next_unused, Perm4::IDENTITY)?;
                    next_unused += 1;
                }
                Some(_) => {
                    let (d, g) = (dest[join_pos], gluing[join_pos]);
                    if d >= next_unused || tri.adjacent(base + d, g.apply(f)).is_some() {
                        return Err(Error::invalid("isosig: invalid gluing destination"));
                    }
                    tri.join(base + t, f, base + d, g)?;
                    join_pos += 1;
                }
                None => return Err(Error::invalid("isosig: facet actions do not match size")),
            }
        }
    }
    Ok(())
}
