//! Numeric constants shared across engines (internal).
//!
//! Policy
//! - Fixed constants, not knobs. Enumeration results never depend on them;
//!   they only decide which integer width the LP runs in and how far the
//!   disc-walking topology queries are willing to go.

/// Multiplier applied to the Hadamard bound before picking the LP integer type.
pub(crate) const HADAMARD_SAFETY: i64 = 4;

/// Upper bound on the total number of discs that disc-by-disc topology
/// queries (orientability, connectedness, boundary curves) will walk.
pub(crate) const MAX_DISC_WALK: i64 = 1 << 22;

/// Coordinates per tetrahedron block, by (triangles stored, octagons stored).
pub(crate) const fn block_width(triangles: bool, octagons: bool) -> usize {
    3 + if triangles { 4 } else { 0 } + if octagons { 3 } else { 0 }
}
