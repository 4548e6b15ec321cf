//! Lists of normal surfaces and the operations that build them.
//!
//! Purpose
//! - [`NormalSurfaces`] owns an insertion-ordered sequence of surfaces in one
//!   triangulation snapshot, together with the coordinate system it was
//!   declared in and the flags describing what it contains and how it was
//!   built.
//! - Lists are values: transforms and filters read a list and return a new
//!   one; only [`NormalSurfaces::sort`] reorders in place.
//!
//! Layout
//! - `mod.rs`: flags, the list type, accessors, custom lists.
//! - `enumerate.rs`: vertex and fundamental enumeration and the algorithm
//!   choice ([`EnumerationCfg`]).
//! - `transform.rs`: reduced ↔ standard conversion and the pair filters.
//! - `filter.rs`: caller-supplied predicates ([`SurfaceFilter`]).
//! - `persist.rs`: serialisable records.

mod enumerate;
mod filter;
mod persist;
mod transform;

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use enumerate::{enumerate_fundamental, enumerate_vertex, EnumerationCfg};
pub use filter::{BoolSet, FilterCombination, FilterProperties, SurfaceFilter};
pub use persist::{ListRecord, SurfaceRecord};
pub use transform::TransformKind;

use crate::encoding::{NormalCoords, NormalEncoding};
use crate::int::ExactInt;
use crate::matching::make_matching_equations;
use crate::surface::NormalSurface;
use crate::triangulation::Triangulation;
use crate::validity::ValidityConstraints;
use crate::{Error, Result};

bitflags! {
    /// What a list contains.
    ///
    /// Exactly one of `EMBEDDED_ONLY` / `IMMERSED_SINGULAR` and exactly one
    /// of `VERTEX` / `FUNDAMENTAL` / `CUSTOM` / `LEGACY` is set on a built
    /// list. Bit values match the persisted form.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NormalList: u32 {
        const EMBEDDED_ONLY = 0x0001;
        const IMMERSED_SINGULAR = 0x0002;
        const VERTEX = 0x0004;
        const FUNDAMENTAL = 0x0008;
        const LEGACY = 0x4000;
        const CUSTOM = 0x8000;
    }
}

bitflags! {
    /// How a list was built. As a request these are hints; a built list
    /// records what actually ran.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NormalAlg: u32 {
        const VERTEX_VIA_REDUCED = 0x0001;
        const VERTEX_STD_DIRECT = 0x0002;
        const VERTEX_TREE = 0x0010;
        const VERTEX_DD = 0x0020;
        const HILBERT_PRIMAL = 0x0100;
        const HILBERT_DUAL = 0x0200;
        const HILBERT_CD = 0x0400;
        const HILBERT_FULLCONE = 0x0800;
        const LEGACY = 0x4000;
        const CUSTOM = 0x8000;
    }
}

/// Keep exactly one flag of `group`: the first one set, or `group[0]` if
/// none is.
pub(crate) fn ensure_one<F>(flags: &mut F, group: &[F])
where
    F: bitflags::Flags + Copy,
{
    let chosen = group.iter().copied().find(|g| flags.contains(*g)).unwrap_or(group[0]);
    for &g in group {
        flags.remove(g);
    }
    flags.insert(chosen);
}

/// Whether a list holds everything it was asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumerationStatus {
    Complete,
    /// The tracker was cancelled; the surfaces present are valid but the
    /// list may be incomplete.
    Cancelled,
}

/// An ordered list of surfaces in one triangulation.
#[derive(Clone, Debug)]
pub struct NormalSurfaces {
    tri: Triangulation,
    coords: NormalCoords,
    which: NormalList,
    alg: NormalAlg,
    status: EnumerationStatus,
    surfaces: Vec<NormalSurface>,
}

impl NormalSurfaces {
    pub(crate) fn empty(
        tri: &Triangulation,
        coords: NormalCoords,
        which: NormalList,
        alg: NormalAlg,
    ) -> Self {
        Self {
            tri: tri.snapshot(),
            coords,
            which,
            alg,
            status: EnumerationStatus::Complete,
            surfaces: Vec::new(),
        }
    }

    /// A hand-made list of the given vectors, each in `coords`.
    ///
    /// Every vector must have the right length and satisfy the matching
    /// equations. The list is marked embedded when every vector obeys the
    /// quadrilateral constraints, immersed otherwise.
    pub fn custom(
        tri: &Triangulation,
        coords: NormalCoords,
        vectors: Vec<Vec<ExactInt>>,
    ) -> Result<Self> {
        let eqns = make_matching_equations(tri, coords)?;
        let vc = ValidityConstraints::for_encoding(NormalEncoding::new(coords), tri.size());
        let mut embedded = true;
        let mut surfaces = Vec::with_capacity(vectors.len());
        for (i, v) in vectors.into_iter().enumerate() {
            if v.len() != eqns.cols() {
                return Err(Error::invalid(format!(
                    "custom vector {i} has {} coordinates, expected {}",
                    v.len(),
                    eqns.cols()
                )));
            }
            if v.iter().any(ExactInt::is_negative) {
                return Err(Error::invalid(format!("custom vector {i} has a negative coordinate")));
            }
            if !eqns.is_satisfied_by(&v) {
                return Err(Error::invalid(format!(
                    "custom vector {i} fails the matching equations"
                )));
            }
            embedded &= vc.allows(&v);
            surfaces.push(NormalSurface::from_coords(tri, coords, v)?);
        }
        let kind = if embedded {
            NormalList::EMBEDDED_ONLY
        } else {
            NormalList::IMMERSED_SINGULAR
        };
        let mut list = Self::empty(tri, coords, NormalList::CUSTOM | kind, NormalAlg::CUSTOM);
        list.surfaces = surfaces;
        Ok(list)
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.tri
    }

    /// The coordinate system the list was declared in. Individual surfaces
    /// may be stored in a wider encoding.
    pub fn coords(&self) -> NormalCoords {
        self.coords
    }

    pub fn which(&self) -> NormalList {
        self.which
    }

    pub fn algorithm(&self) -> NormalAlg {
        self.alg
    }

    pub fn status(&self) -> EnumerationStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == EnumerationStatus::Complete
    }

    pub fn is_embedded_only(&self) -> bool {
        self.which.contains(NormalList::EMBEDDED_ONLY)
    }

    pub fn allows_almost_normal(&self) -> bool {
        self.coords.stores_octagons()
    }

    /// Whether members may be spun: reduced, non-closed coordinates on an
    /// ideal or invalid triangulation.
    pub fn allows_non_compact(&self) -> bool {
        NormalEncoding::new(self.coords).could_be_non_compact()
            && (self.tri.is_ideal() || !self.tri.is_valid())
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surface(&self, i: usize) -> Option<&NormalSurface> {
        self.surfaces.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalSurface> {
        self.surfaces.iter()
    }

    /// Raw vectors, each in its surface's own encoding.
    pub fn vectors(&self) -> impl Iterator<Item = &[ExactInt]> + '_ {
        self.surfaces.iter().map(NormalSurface::vector)
    }

    /// Stable sort by a caller-supplied comparison.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&NormalSurface, &NormalSurface) -> std::cmp::Ordering,
    {
        self.surfaces.sort_by(compare);
    }

    /// Stable sort by a caller-supplied key.
    pub fn sort_by_key<K: Ord, F: FnMut(&NormalSurface) -> K>(&mut self, key: F) {
        self.surfaces.sort_by_key(key);
    }

    /// Sort into the canonical surface order.
    pub fn sort(&mut self) {
        self.surfaces.sort();
    }

    pub(crate) fn push(&mut self, s: NormalSurface) {
        self.surfaces.push(s);
    }

    /// Whether both lists hold the same surfaces, ignoring order and
    /// encodings.
    pub fn same_surfaces(&self, other: &NormalSurfaces) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut a: Vec<&NormalSurface> = self.iter().collect();
        let mut b: Vec<&NormalSurface> = other.iter().collect();
        a.sort();
        b.sort();
        a == b
    }
}

impl<'a> IntoIterator for &'a NormalSurfaces {
    type Item = &'a NormalSurface;
    type IntoIter = std::slice::Iter<'a, NormalSurface>;

    fn into_iter(self) -> Self::IntoIter {
        self.surfaces.iter()
    }
}

impl fmt::Display for NormalSurfaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.which.contains(NormalList::VERTEX) {
            "vertex"
        } else if self.which.contains(NormalList::FUNDAMENTAL) {
            "fundamental"
        } else {
            "custom"
        };
        let scope = if self.is_embedded_only() {
            "embedded"
        } else {
            "embedded / immersed / singular"
        };
        write!(f, "{} {kind} surfaces ({scope}, {})", self.len(), self.coords.name())?;
        if self.status == EnumerationStatus::Cancelled {
            write!(f, " [cancelled]")?;
        }
        Ok(())
    }
}
