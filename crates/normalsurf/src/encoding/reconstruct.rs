//! Recover triangle coordinates from a quad (or quad-oct) vector.
//!
//! A triangle at corner `(t, v)` meets face `f` of `t` in an arc around `v`.
//! Across the gluing `(u, g)` of face `f`, arc counts must agree:
//!
//! `T[t,v] + A(t, v, f) = T[u, g(v)] + A(u, g(v), g(f))`
//!
//! where `A` counts the quad and octagon arcs around that corner of that face.
//! Walking the corners of each vertex link propagates `T`; a walk that
//! revisits a corner with a different value means the surface spins into a
//! cusp. Each link is then shifted so its smallest corner is zero.

use super::NormalEncoding;
use crate::int::ExactInt;
use crate::tables::{quad_sep, QUAD_MEETING};
use crate::triangulation::Triangulation;
use crate::{Error, Result};

/// Non-triangle arcs around vertex `v` on face `f` of one block.
fn other_arcs(block: &[ExactInt], enc: NormalEncoding, v: usize, f: usize) -> ExactInt {
    let q = enc.quad_offset();
    let mut a = block[q + quad_sep(v, f)].clone();
    if enc.stores_octagons() {
        let o = enc.oct_offset();
        for k in QUAD_MEETING[v][f] {
            a += &block[o + k as usize];
        }
    }
    a
}

impl NormalEncoding {
    /// Expand `vec` in place to the encoding with triangles and return it.
    ///
    /// Fails with `InvalidArgument` if the vector has the wrong length or does
    /// not describe a compact surface (some vertex link walk is inconsistent).
    /// On failure `vec` is left untouched.
    pub fn reconstruct_triangles(
        self,
        tri: &Triangulation,
        vec: &mut Vec<ExactInt>,
    ) -> Result<NormalEncoding> {
        if self.stores_triangles() {
            return Ok(self);
        }
        let n = tri.size();
        let w = self.block_size();
        if vec.len() != n * w {
            return Err(Error::invalid(format!(
                "reconstruct_triangles: expected {} coordinates, got {}",
                n * w,
                vec.len()
            )));
        }

        let mut value: Vec<Option<ExactInt>> = vec![None; 4 * n];
        let mut link_of = vec![usize::MAX; 4 * n];
        let mut links: Vec<Vec<usize>> = Vec::new();
        for start in 0..4 * n {
            if value[start].is_some() {
                continue;
            }
            let id = links.len();
            let mut members = vec![start];
            value[start] = Some(ExactInt::ZERO);
            link_of[start] = id;
            let mut stack = vec![start];
            while let Some(c) = stack.pop() {
                let (t, v) = (c / 4, c % 4);
                let cur = value[c].clone().unwrap_or_default();
                let here = &vec[t * w..(t + 1) * w];
                for f in (0..4).filter(|&f| f != v) {
                    let Some((u, g)) = tri.adjacent(t, f) else {
                        continue;
                    };
                    let (gv, gf) = (g.apply(v), g.apply(f));
                    let there = &vec[u * w..(u + 1) * w];
                    let next =
                        &cur + &other_arcs(here, self, v, f) - &other_arcs(there, self, gv, gf);
                    let d = 4 * u + gv;
                    match &value[d] {
                        Some(old) if *old != next => {
                            return Err(Error::invalid(
                                "reconstruct_triangles: vector spins into a cusp",
                            ));
                        }
                        Some(_) => {}
                        None => {
                            value[d] = Some(next);
                            link_of[d] = id;
                            members.push(d);
                            stack.push(d);
                        }
                    }
                }
            }
            links.push(members);
        }

        let mut mins = Vec::with_capacity(links.len());
        for members in &links {
            let m = members
                .iter()
                .filter_map(|&c| value[c].clone())
                .min()
                .unwrap_or_default();
            mins.push(m);
        }

        let enc = self.with_triangles();
        let wide = enc.block_size();
        let mut out = Vec::with_capacity(n * wide);
        for t in 0..n {
            for v in 0..4 {
                let c = 4 * t + v;
                let tv = value[c].clone().unwrap_or_default();
                out.push(tv - &mins[link_of[c]]);
            }
            out.extend_from_slice(&vec[t * w..(t + 1) * w]);
        }
        *vec = out;
        Ok(enc)
    }
}
