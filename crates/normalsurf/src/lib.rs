//! Normal and almost normal surface enumeration in 3-manifold triangulations.
//!
//! Layers (bottom up)
//! - `int`, `bitmask`, `perm`, `tables`: exact integers, bitsets, vertex
//!   permutations and the fixed combinatorics of one tetrahedron.
//! - `triangulation`: gluings, skeleta, text decoders and a small catalog.
//! - `encoding`, `matching`, `validity`: coordinate layouts, matching
//!   equations and quadrilateral constraints.
//! - `dd`, `lp`, `tree`, `hilbert`: the enumeration engines (double
//!   description, tableaux, tree traversal, Hilbert bases).
//! - `surface`, `list`: concrete surfaces and lists of them.
//!
//! Most callers only need [`list::enumerate_vertex`] or
//! [`list::EnumerationCfg`]; [`prelude`] collects the common types.

pub mod bitmask;
pub(crate) mod cfg;
pub mod dd;
pub(crate) mod dsu;
pub mod encoding;
pub mod error;
pub mod hilbert;
pub mod int;
pub mod list;
pub mod lp;
pub mod matching;
pub mod perm;
pub mod progress;
pub mod surface;
pub mod tables;
pub mod tree;
pub mod triangulation;
pub mod validity;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::encoding::{NormalCoords, NormalEncoding};
    pub use crate::int::ExactInt;
    pub use crate::list::{
        enumerate_fundamental, enumerate_vertex, BoolSet, EnumerationCfg, EnumerationStatus,
        FilterCombination, FilterProperties, ListRecord, NormalAlg, NormalList, NormalSurfaces,
        SurfaceFilter, TransformKind,
    };
    pub use crate::progress::ProgressTracker;
    pub use crate::surface::NormalSurface;
    pub use crate::triangulation::{catalog, Triangulation};
    pub use crate::{Error, Result};
}
