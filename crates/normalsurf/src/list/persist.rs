//! Serialisable snapshots of lists.
//!
//! A record carries integer tags rather than Rust enums so that files stay
//! readable if variants are added. Triangulations are not part of the record;
//! the caller pairs a record with the triangulation it was built on.

use serde::{Deserialize, Serialize};

use super::{EnumerationStatus, NormalAlg, NormalList, NormalSurfaces};
use crate::encoding::{NormalCoords, NormalEncoding};
use crate::int::ExactInt;
use crate::surface::NormalSurface;
use crate::triangulation::Triangulation;
use crate::{Error, Result};

/// One surface: its declared coordinate system, stored encoding and vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    pub coords_tag: i32,
    pub encoding_tag: i32,
    pub vector: Vec<ExactInt>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub coords_tag: i32,
    pub which: u32,
    pub algorithm: u32,
    #[serde(default)]
    pub cancelled: bool,
    pub surfaces: Vec<SurfaceRecord>,
}

impl NormalSurfaces {
    pub fn to_record(&self) -> ListRecord {
        let coords_tag = self.coords.tag();
        ListRecord {
            coords_tag,
            which: self.which.bits(),
            algorithm: self.alg.bits(),
            cancelled: self.status == EnumerationStatus::Cancelled,
            surfaces: self
                .iter()
                .map(|s| SurfaceRecord {
                    coords_tag,
                    encoding_tag: s.encoding().int_value(),
                    vector: s.vector().to_vec(),
                    name: s.name().to_string(),
                })
                .collect(),
        }
    }

    /// Rebuild a list on `tri`.
    ///
    /// Rejects unknown tags or flag bits, surfaces declared in a different
    /// coordinate system from the list, octagon-bearing encodings in a list
    /// without octagons, negative entries and wrong vector lengths.
    pub fn from_record(tri: &Triangulation, rec: &ListRecord) -> Result<NormalSurfaces> {
        let coords = NormalCoords::from_tag(rec.coords_tag)?;
        let which = NormalList::from_bits(rec.which)
            .ok_or_else(|| Error::invalid(format!("unknown list flags {:#x}", rec.which)))?;
        let alg = NormalAlg::from_bits(rec.algorithm)
            .ok_or_else(|| {
                Error::invalid(format!("unknown algorithm flags {:#x}", rec.algorithm))
            })?;

        let mut list = NormalSurfaces::empty(tri, coords, which, alg);
        if rec.cancelled {
            list.status = EnumerationStatus::Cancelled;
        }
        for (i, s) in rec.surfaces.iter().enumerate() {
            if s.coords_tag != rec.coords_tag {
                return Err(Error::invalid(format!(
                    "surface {i} is declared in coordinate tag {}, list uses {}",
                    s.coords_tag, rec.coords_tag
                )));
            }
            let enc = NormalEncoding::from_int_value(s.encoding_tag)?;
            if enc.stores_octagons() && !coords.stores_octagons() {
                return Err(Error::invalid(format!(
                    "surface {i} has octagons in {}",
                    coords.name()
                )));
            }
            if s.vector.iter().any(ExactInt::is_negative) {
                return Err(Error::invalid(format!("surface {i} has a negative coordinate")));
            }
            let surface = NormalSurface::new(tri, enc, s.vector.clone())?.with_name(s.name.clone());
            list.push(surface);
        }
        tracing::debug!(surfaces = list.len(), coords = coords.name(), "list restored");
        Ok(list)
    }
}
