//! Exact integer arithmetic.
//!
//! Purpose
//! - `ExactInt` stores every coordinate of every surface: a native `i64` fast
//!   path that promotes itself to a `num_bigint::BigInt` on overflow.
//! - `LpInt` abstracts over the three widths the LP tableau may run in
//!   (`i64`, `i128`, `ExactInt`), all with checked operations.

mod exact;
mod lpint;

pub use exact::ExactInt;
pub use lpint::LpInt;

/// Non-negative gcd of all entries (0 for the zero vector).
pub fn gcd_of(v: &[ExactInt]) -> ExactInt {
    let mut g = ExactInt::ZERO;
    for x in v {
        if !x.is_zero() {
            g = g.gcd(x);
            if g == ExactInt::ONE {
                break;
            }
        }
    }
    g
}

/// Divide out the gcd of `v` in place and return it.
///
/// Idempotent: a second call returns 1 (or 0 for the zero vector).
pub fn scale_down(v: &mut [ExactInt]) -> ExactInt {
    let g = gcd_of(v);
    if !g.is_zero() && g != ExactInt::ONE {
        for x in v.iter_mut() {
            *x = x.div_exact(&g);
        }
    }
    g
}

/// Convert a slice of native values.
pub fn exact_vec(v: &[i64]) -> Vec<ExactInt> {
    v.iter().map(|&x| ExactInt::from(x)).collect()
}

#[cfg(test)]
mod tests;
