//! Whole-list transforms: solution set conversion and the pair filters.
//!
//! Reduced → standard
//! - Every standard vertex surface projects into some face of the reduced
//!   cone spanned by a maximal compatible family of reduced vertex
//!   surfaces. Each such face lifts to a face of the standard cone (quad
//!   and octagon columns outside the family's support held at zero), and
//!   the extremal rays of a face are extremal rays of the cone. Running
//!   double description on each lifted face and merging the results gives
//!   the standard vertex set, vertex links included.
//!
//! Standard → reduced
//! - Project, drop zero projections (vertex links), scale down and keep
//!   the vectors whose support is minimal among the projections.

use std::collections::{BTreeSet, HashSet};

use super::enumerate::materialise;
use super::{EnumerationStatus, NormalAlg, NormalList, NormalSurfaces};
use crate::bitmask::Bitmask;
use crate::dd::extremal_rays_in_face;
use crate::encoding::{NormalCoords, NormalEncoding};
use crate::hilbert::maximal_faces;
use crate::int::{scale_down, ExactInt};
use crate::matching::make_matching_equations;
use crate::progress::{poll, ProgressTracker};
use crate::surface::NormalSurface;
use crate::triangulation::Triangulation;
use crate::validity::ValidityConstraints;
use crate::{Error, Result};

/// Transforms producing a new list from an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Quad (or quad-oct) embedded vertex list → standard (or almost
    /// normal) embedded vertex list.
    ConvertReducedToStandard,
    /// The reverse conversion.
    ConvertStandardToReduced,
    /// Surfaces locally compatible with some other member.
    FilterCompatible,
    /// Compact connected non-empty surfaces disjoint from some other such
    /// member.
    FilterDisjoint,
    /// Surfaces not ruled out as incompressible by quick tests.
    FilterIncompressible,
}

fn support(v: &[ExactInt]) -> Bitmask {
    let mut b = Bitmask::new(v.len());
    for (i, x) in v.iter().enumerate() {
        if !x.is_zero() {
            b.set(i, true);
        }
    }
    b
}

/// Expand reduced vertex rays (in the encoding of the reduced counterpart
/// of `coords`) to the vertex rays in `coords`.
pub(crate) fn expand_to_standard(
    tri: &Triangulation,
    coords: NormalCoords,
    rays: &[Vec<ExactInt>],
    tracker: Option<&ProgressTracker>,
    sink: &mut dyn FnMut(Vec<ExactInt>),
) -> Result<()> {
    let reduced = coords
        .reduced_counterpart()
        .ok_or_else(|| Error::invalid(format!("{coords:?} has no reduced counterpart")))?;
    let red = NormalEncoding::new(reduced);
    let full = NormalEncoding::new(coords);
    let n = tri.size();
    let (rw, sw) = (red.block_size(), full.block_size());
    if let Some(bad) = rays.iter().find(|r| r.len() != n * rw) {
        return Err(Error::invalid(format!(
            "reduced ray has {} coordinates, expected {}",
            bad.len(),
            n * rw
        )));
    }

    let supports: Vec<Bitmask> = rays.iter().map(|r| support(r)).collect();
    let masks = ValidityConstraints::for_encoding(red, n).bitmasks(n * rw);
    let mut faces = maximal_faces(&supports, &masks);
    if faces.is_empty() {
        // Only the vertex links remain.
        faces.push(Vec::new());
    }
    let eqns = make_matching_equations(tri, coords)?;
    let vc = ValidityConstraints::for_encoding(full, n);
    let shift = full.quad_offset();

    let mut seen: BTreeSet<Vec<ExactInt>> = BTreeSet::new();
    for face in &faces {
        poll(tracker)?;
        let mut used = Bitmask::new(n * rw);
        for &i in face {
            used = used.or(&supports[i]);
        }
        let mut forced = Bitmask::new(n * sw);
        for t in 0..n {
            for k in 0..rw {
                if !used.get(t * rw + k) {
                    forced.set(t * sw + shift + k, true);
                }
            }
        }
        extremal_rays_in_face(&eqns, &vc, &forced, tracker, |v| {
            if seen.insert(v.clone()) {
                sink(v);
            }
        })?;
    }
    tracing::debug!(faces = faces.len(), found = seen.len(), "expanded reduced solution set");
    Ok(())
}

impl NormalSurfaces {
    /// Apply `kind`, leaving `self` untouched.
    ///
    /// Conversions need a complete embedded vertex list on a valid
    /// triangulation without ideal vertices. The filters need an embedded
    /// list; the incompressibility filter also needs a valid closed
    /// triangulation and no octagons. Unmet preconditions give
    /// `FailedPrecondition`.
    pub fn transform(&self, kind: TransformKind) -> Result<NormalSurfaces> {
        let out = match kind {
            TransformKind::ConvertReducedToStandard => self.reduced_to_standard()?,
            TransformKind::ConvertStandardToReduced => self.standard_to_reduced()?,
            TransformKind::FilterCompatible => self.filter_compatible()?,
            TransformKind::FilterDisjoint => self.filter_disjoint()?,
            TransformKind::FilterIncompressible => self.filter_incompressible()?,
        };
        tracing::debug!(?kind, before = self.len(), after = out.len(), "list transform");
        Ok(out)
    }

    fn check_vertex_list(&self) -> Result<()> {
        if !self.which.contains(NormalList::VERTEX | NormalList::EMBEDDED_ONLY) {
            return Err(Error::precondition("conversion needs an embedded vertex list"));
        }
        if self.status != EnumerationStatus::Complete {
            return Err(Error::precondition("conversion needs a complete list"));
        }
        if !self.tri.is_valid() || self.tri.is_ideal() {
            return Err(Error::precondition(
                "conversion needs a valid triangulation without ideal vertices",
            ));
        }
        Ok(())
    }

    /// A copy of the flags of `self` for a list of surfaces picked out of it.
    pub(crate) fn filtered_shell(&self) -> NormalSurfaces {
        let scope = NormalList::EMBEDDED_ONLY | NormalList::IMMERSED_SINGULAR;
        let which = (self.which & scope) | NormalList::CUSTOM;
        let mut out = NormalSurfaces::empty(&self.tri, self.coords, which, NormalAlg::CUSTOM);
        out.status = self.status;
        out
    }

    fn reduced_to_standard(&self) -> Result<NormalSurfaces> {
        self.check_vertex_list()?;
        let target = self
            .coords
            .standard_counterpart()
            .ok_or_else(|| {
                Error::precondition("reduced to standard needs a quad or quad-oct list")
            })?;
        let enc = NormalEncoding::new(self.coords);
        let rays = self.iter().map(|s| s.vector_in(enc)).collect::<Result<Vec<_>>>()?;
        let mut raw: Vec<Vec<ExactInt>> = Vec::new();
        expand_to_standard(&self.tri, target, &rays, None, &mut |v| raw.push(v))?;

        let alg = (self.alg & (NormalAlg::VERTEX_TREE | NormalAlg::VERTEX_DD))
            | NormalAlg::VERTEX_VIA_REDUCED;
        let mut out = NormalSurfaces::empty(&self.tri, target, self.which, alg);
        for v in raw {
            out.push(materialise(&self.tri, target, v)?);
        }
        Ok(out)
    }

    fn standard_to_reduced(&self) -> Result<NormalSurfaces> {
        self.check_vertex_list()?;
        let target = self
            .coords
            .reduced_counterpart()
            .ok_or_else(|| {
                Error::precondition("standard to reduced needs a standard or almost normal list")
            })?;
        let enc = NormalEncoding::new(target);
        let mut seen = HashSet::new();
        let mut projected = Vec::new();
        for s in self {
            let mut v = s.vector_in(enc)?;
            if v.iter().all(ExactInt::is_zero) {
                continue;
            }
            scale_down(&mut v);
            if seen.insert(v.clone()) {
                projected.push(v);
            }
        }
        let supports: Vec<Bitmask> = projected.iter().map(|v| support(v)).collect();
        let alg = self.alg & (NormalAlg::VERTEX_TREE | NormalAlg::VERTEX_DD);
        let mut out = NormalSurfaces::empty(&self.tri, target, self.which, alg);
        for (v, sup) in projected.into_iter().zip(&supports) {
            let dominated = supports
                .iter()
                .any(|other| other.count() < sup.count() && other.is_subset_of(sup));
            if !dominated {
                out.push(materialise(&self.tri, target, v)?);
            }
        }
        Ok(out)
    }

    fn check_embedded(&self, what: &str) -> Result<()> {
        if !self.is_embedded_only() {
            return Err(Error::precondition(format!("{what} needs an embedded list")));
        }
        Ok(())
    }

    fn filter_compatible(&self) -> Result<NormalSurfaces> {
        self.check_embedded("compatibility filtering")?;
        let mut out = self.filtered_shell();
        for (i, s) in self.iter().enumerate() {
            if self
                .iter()
                .enumerate()
                .any(|(j, t)| j != i && s.locally_compatible(t))
            {
                out.push(s.clone());
            }
        }
        Ok(out)
    }

    /// A failed component or disjointness test aborts the whole filter.
    fn filter_disjoint(&self) -> Result<NormalSurfaces> {
        self.check_embedded("disjointness filtering")?;
        let mut usable = Vec::new();
        for (i, s) in self.surfaces.iter().enumerate() {
            if s.is_compact() && !s.is_empty() && s.is_connected()? {
                usable.push(i);
            }
        }
        let mut keep = vec![false; self.len()];
        for (a, &i) in usable.iter().enumerate() {
            for &j in &usable[a + 1..] {
                if keep[i] && keep[j] {
                    continue;
                }
                if self.surfaces[i].disjoint(&self.surfaces[j])? {
                    keep[i] = true;
                    keep[j] = true;
                }
            }
        }
        let kept = keep.iter().filter(|&&k| k).count();
        tracing::debug!(candidates = usable.len(), kept, "disjointness filter");
        let mut out = self.filtered_shell();
        for (s, &k) in self.iter().zip(&keep) {
            if k {
                out.push(s.clone());
            }
        }
        Ok(out)
    }

    fn filter_incompressible(&self) -> Result<NormalSurfaces> {
        self.check_embedded("incompressibility filtering")?;
        if self.coords.stores_octagons() {
            return Err(Error::precondition(
                "incompressibility filtering does not handle almost normal surfaces",
            ));
        }
        if !self.tri.is_valid() || !self.tri.is_closed() {
            return Err(Error::precondition(
                "incompressibility filtering needs a valid closed triangulation",
            ));
        }
        let mut out = self.filtered_shell();
        for (i, s) in self.iter().enumerate() {
            match might_be_incompressible(s) {
                Ok(true) => out.push(s.clone()),
                Ok(false) => {}
                Err(Error::UnsolvedCase(msg)) => {
                    // Too large to test, so it cannot be ruled out.
                    tracing::warn!(surface = i, msg, "keeping untested surface");
                    out.push(s.clone());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }
}

/// Quick tests that can only rule a surface out: vertex links, thin edge
/// links and spheres go, and so does anything whose two-sided version cuts
/// the manifold into pieces with a simple compressing disc.
fn might_be_incompressible(s: &NormalSurface) -> Result<bool> {
    if !s.is_compact() || s.is_empty() || s.is_vertex_linking() {
        return Ok(false);
    }
    if s.is_thin_edge_link().0.is_some() {
        return Ok(false);
    }
    if !s.is_connected()? {
        return Ok(false);
    }
    let cover = if s.is_two_sided()? { s.clone() } else { s.double() };
    if cover.is_sphere()? {
        return Ok(false);
    }
    let cut = cover.cut_along()?;
    Ok(!cut.has_simple_compressing_disc())
}
