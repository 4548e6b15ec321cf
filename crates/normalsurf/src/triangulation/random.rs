//! Seeded random gluings for property tests and benches.
//!
//! Model
//! - Tetrahedron `i > 0` is first glued to a random free face of a random
//!   earlier tetrahedron, so the result is connected.
//! - The remaining free faces are paired at random (one face is left
//!   unglued if the count is odd) with uniformly random permutations.
//! - Nothing forces a manifold: edges may be invalid and vertex links may be
//!   anything. Enumeration is still well defined on such inputs.
//! - Determinism uses a replay token `(seed, index)` mixed into one `StdRng`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Triangulation;
use crate::perm::Perm4;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Options for [`random_gluing`].
#[derive(Clone, Copy, Debug)]
pub struct RandomCfg {
    pub tetrahedra: usize,
    /// Probability of leaving a free face on the boundary instead of pairing it.
    pub boundary_prob: f64,
    /// Only use odd gluings, so the result is oriented.
    pub oriented: bool,
}

impl Default for RandomCfg {
    fn default() -> Self {
        Self {
            tetrahedra: 3,
            boundary_prob: 0.0,
            oriented: false,
        }
    }
}

fn random_perm(rng: &mut StdRng, oriented: bool) -> Perm4 {
    loop {
        let p = Perm4::from_ordered_index(rng.gen_range(0..24)).unwrap_or_default();
        if !oriented || !p.is_even() {
            return p;
        }
    }
}

/// Draw a connected random triangulation.
pub fn random_gluing(cfg: RandomCfg, tok: ReplayToken) -> Triangulation {
    let mut rng = tok.to_std_rng();
    let n = cfg.tetrahedra;
    let mut tri = Triangulation::with_size(n);
    for i in 1..n {
        let free: Vec<(usize, usize)> = (0..i)
            .flat_map(|t| (0..4).map(move |f| (t, f)))
            .filter(|&(t, f)| tri.adjacent(t, f).is_none())
            .collect();
        if let Some(&(t, f)) = free.choose(&mut rng) {
            let g = random_perm(&mut rng, cfg.oriented);
            // Tetrahedron `i` is still untouched, so every face is free.
            let _ = tri.join(i, g.apply(f), t, g.inverse());
        }
    }
    let mut free: Vec<(usize, usize)> = (0..n)
        .flat_map(|t| (0..4).map(move |f| (t, f)))
        .filter(|&(t, f)| tri.adjacent(t, f).is_none())
        .collect();
    free.shuffle(&mut rng);
    while let Some((t, f)) = free.pop() {
        if cfg.boundary_prob > 0.0 && rng.gen_bool(cfg.boundary_prob.clamp(0.0, 1.0)) {
            continue;
        }
        let Some((u, e)) = free.pop() else {
            break;
        };
        // Choose the permutation so that face f lands on face e.
        let base = random_perm(&mut rng, cfg.oriented);
        let fix = Perm4::transposition(base.apply(f), e);
        let mut g = fix * base;
        if cfg.oriented && g.is_even() {
            let others: Vec<usize> = (0..4).filter(|&x| x != e).collect();
            g = Perm4::transposition(others[0], others[1]) * g;
        }
        let _ = tri.join(t, f, u, g);
    }
    tri
}
