//! Coordinate systems and vector encodings.
//!
//! Purpose
//! - `NormalCoords` is the user-facing choice of coordinate system.
//! - `NormalEncoding` describes how one stored vector is laid out: block
//!   width per tetrahedron, which disc kinds are present, and whether the
//!   vector may describe a spun (non-compact) surface.
//!
//! Layout
//! - Within a tetrahedron block: triangle types 0..3 (if stored), then quad
//!   types 0..2, then octagon types 0..2 (if stored).
//! - A surface may carry a different encoding from the list it sits in;
//!   equality of surfaces never depends on the encoding.

mod reconstruct;

use serde::{Deserialize, Serialize};

use crate::cfg::block_width;
use crate::{Error, Result};

/// User-visible coordinate systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NormalCoords {
    /// Triangles and quads (7 per tetrahedron).
    Standard,
    /// Quads only (3 per tetrahedron); spun surfaces allowed.
    Quad,
    /// Quads only, restricted to surfaces that close up at every cusp.
    QuadClosed,
    /// Triangles, quads and octagons (10 per tetrahedron).
    AlmostNormal,
    /// Quads and octagons (6 per tetrahedron).
    QuadOct,
    /// Quads and octagons, closed at every cusp.
    QuadOctClosed,
}

impl NormalCoords {
    pub const ALL: [NormalCoords; 6] = [
        NormalCoords::Standard,
        NormalCoords::Quad,
        NormalCoords::QuadClosed,
        NormalCoords::AlmostNormal,
        NormalCoords::QuadOct,
        NormalCoords::QuadOctClosed,
    ];

    /// Stable integer tag used in persisted records.
    pub fn tag(self) -> i32 {
        match self {
            NormalCoords::Standard => 0,
            NormalCoords::Quad => 1,
            NormalCoords::QuadClosed => 10,
            NormalCoords::QuadOct => 101,
            NormalCoords::AlmostNormal => 102,
            NormalCoords::QuadOctClosed => 110,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == tag)
            .ok_or_else(|| Error::invalid(format!("unknown coordinate system tag {tag}")))
    }

    pub fn name(self) -> &'static str {
        match self {
            NormalCoords::Standard => "Standard normal (tri-quad)",
            NormalCoords::Quad => "Quad normal",
            NormalCoords::QuadClosed => "Closed quad (non-spun)",
            NormalCoords::AlmostNormal => "Standard almost normal (tri-quad-oct)",
            NormalCoords::QuadOct => "Quad-oct almost normal",
            NormalCoords::QuadOctClosed => "Closed quad-oct (non-spun)",
        }
    }

    /// Parse a short command-line name (`standard`, `quad`, `an`, ...).
    pub fn from_short_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "std" => Some(NormalCoords::Standard),
            "quad" => Some(NormalCoords::Quad),
            "quad-closed" | "quadclosed" => Some(NormalCoords::QuadClosed),
            "an" | "almost-normal" | "almostnormal" => Some(NormalCoords::AlmostNormal),
            "quad-oct" | "quadoct" => Some(NormalCoords::QuadOct),
            "quad-oct-closed" | "quadoctclosed" => Some(NormalCoords::QuadOctClosed),
            _ => None,
        }
    }

    /// Triangles are not stored.
    pub fn is_reduced(self) -> bool {
        !matches!(self, NormalCoords::Standard | NormalCoords::AlmostNormal)
    }

    pub fn stores_octagons(self) -> bool {
        matches!(
            self,
            NormalCoords::AlmostNormal | NormalCoords::QuadOct | NormalCoords::QuadOctClosed
        )
    }

    pub fn is_closed_variant(self) -> bool {
        matches!(self, NormalCoords::QuadClosed | NormalCoords::QuadOctClosed)
    }

    /// Standard → Quad, AlmostNormal → QuadOct; `None` for reduced systems.
    pub fn reduced_counterpart(self) -> Option<Self> {
        match self {
            NormalCoords::Standard => Some(NormalCoords::Quad),
            NormalCoords::AlmostNormal => Some(NormalCoords::QuadOct),
            _ => None,
        }
    }

    /// Quad → Standard, QuadOct → AlmostNormal; `None` otherwise.
    pub fn standard_counterpart(self) -> Option<Self> {
        match self {
            NormalCoords::Quad => Some(NormalCoords::Standard),
            NormalCoords::QuadOct => Some(NormalCoords::AlmostNormal),
            _ => None,
        }
    }
}

/// Layout and properties of one stored vector.
///
/// The bit layout is persisted (`int_value`), so the constants are fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NormalEncoding {
    flags: i32,
}

impl NormalEncoding {
    const SIZE_MASK: i32 = 0x000F;
    const STORES_TRIANGLES: i32 = 0x0010;
    const STORES_OCTAGONS: i32 = 0x0020;
    const COULD_BE_VERTEX_LINK: i32 = 0x0100;
    const COULD_BE_NON_COMPACT: i32 = 0x0200;
    const INVALID: i32 = 0x1000;

    pub fn new(coords: NormalCoords) -> Self {
        let flags = match coords {
            NormalCoords::Standard => 7 | Self::STORES_TRIANGLES | Self::COULD_BE_VERTEX_LINK,
            NormalCoords::Quad => 3 | Self::COULD_BE_NON_COMPACT,
            NormalCoords::QuadClosed => 3,
            NormalCoords::AlmostNormal => {
                10 | Self::STORES_TRIANGLES | Self::STORES_OCTAGONS | Self::COULD_BE_VERTEX_LINK
            }
            NormalCoords::QuadOct => 6 | Self::STORES_OCTAGONS | Self::COULD_BE_NON_COMPACT,
            NormalCoords::QuadOctClosed => 6 | Self::STORES_OCTAGONS,
        };
        Self { flags }
    }

    /// Encoding of the zero-width vector; the identity for [`Self::union`].
    pub fn empty() -> Self {
        Self { flags: 0 }
    }

    pub fn is_valid(self) -> bool {
        self.flags & Self::INVALID == 0
    }

    /// Stored coordinates per tetrahedron: 3, 6, 7 or 10.
    pub fn block_size(self) -> usize {
        (self.flags & Self::SIZE_MASK) as usize
    }

    pub fn stores_triangles(self) -> bool {
        self.flags & Self::STORES_TRIANGLES != 0
    }

    pub fn stores_octagons(self) -> bool {
        self.flags & Self::STORES_OCTAGONS != 0
    }

    pub fn could_be_vertex_link(self) -> bool {
        self.flags & Self::COULD_BE_VERTEX_LINK != 0
    }

    pub fn could_be_non_compact(self) -> bool {
        self.flags & Self::COULD_BE_NON_COMPACT != 0
    }

    /// Offset of quad type 0 within a block.
    pub fn quad_offset(self) -> usize {
        if self.stores_triangles() {
            4
        } else {
            0
        }
    }

    /// Offset of octagon type 0 within a block (meaningless without octagons).
    pub fn oct_offset(self) -> usize {
        self.quad_offset() + 3
    }

    /// The same encoding with triangle coordinates added.
    pub fn with_triangles(self) -> Self {
        if self.stores_triangles() || !self.is_valid() {
            return self;
        }
        Self {
            flags: (self.flags | Self::STORES_TRIANGLES) + 4,
        }
    }

    pub fn with_octagons(self) -> Self {
        if self.stores_octagons() || !self.is_valid() {
            return self;
        }
        Self {
            flags: (self.flags | Self::STORES_OCTAGONS) + 3,
        }
    }

    pub fn without_octagons(self) -> Self {
        if !self.stores_octagons() || !self.is_valid() {
            return self;
        }
        Self {
            flags: (self.flags & !Self::STORES_OCTAGONS) - 3,
        }
    }

    /// Smallest encoding able to hold both inputs, e.g. for the sum of two
    /// surfaces stored differently.
    pub fn union(self, other: Self) -> Self {
        if !self.is_valid() || !other.is_valid() {
            return Self { flags: Self::INVALID };
        }
        if self.block_size() == 0 {
            return other;
        }
        if other.block_size() == 0 {
            return self;
        }
        let kinds = (self.flags | other.flags) & !Self::SIZE_MASK;
        let tri = kinds & Self::STORES_TRIANGLES != 0;
        let oct = kinds & Self::STORES_OCTAGONS != 0;
        Self {
            flags: kinds | block_width(tri, oct) as i32,
        }
    }

    /// Stable integer form for persistence.
    pub fn int_value(self) -> i32 {
        self.flags
    }

    pub fn from_int_value(v: i32) -> Result<Self> {
        let e = Self { flags: v };
        let tri = e.stores_triangles();
        let oct = e.stores_octagons();
        if !e.is_valid() || e.block_size() != block_width(tri, oct) {
            return Err(Error::invalid(format!("invalid encoding value {v:#x}")));
        }
        Ok(e)
    }
}

impl From<NormalCoords> for NormalEncoding {
    fn from(c: NormalCoords) -> Self {
        NormalEncoding::new(c)
    }
}

#[cfg(test)]
mod tests;
