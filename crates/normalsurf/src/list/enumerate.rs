//! Vertex and fundamental enumeration.
//!
//! Algorithm choice (vertex lists)
//! - Tree traversal unless double description is requested or the list
//!   admits immersed surfaces (the tree needs the quadrilateral
//!   constraints).
//! - Standard and almost normal coordinates go through the reduced system
//!   and are then expanded, provided the list is embedded and the
//!   triangulation is valid without ideal vertices. Otherwise they are
//!   enumerated directly.
//!
//! Algorithm choice (fundamental lists)
//! - Primal, then dual, full cone, Contejean–Devie. Primal needs the
//!   quadrilateral constraints, so immersed lists fall back to dual.
//!
//! Storage
//! - Quad and quad-oct vectors on a valid triangulation without ideal
//!   vertices get their triangles reconstructed and are stored in the
//!   standard counterpart. Elsewhere vectors stay as enumerated.

use super::transform::expand_to_standard;
use super::{ensure_one, EnumerationStatus, NormalAlg, NormalList, NormalSurfaces};
use crate::dd::enumerate_extremal_rays;
use crate::encoding::{NormalCoords, NormalEncoding};
use crate::hilbert::{hilbert_cd, hilbert_dual, hilbert_fullcone, hilbert_primal, ShadowRays};
use crate::int::ExactInt;
use crate::lp::hadamard::choose_int;
use crate::lp::{BanNone, LpConstraintEulerPositive, LpConstraintNonSpun, LpConstraintNone};
use crate::matching::make_matching_equations;
use crate::progress::ProgressTracker;
use crate::surface::NormalSurface;
use crate::tree::{tree_single, tree_vertices};
use crate::triangulation::Triangulation;
use crate::validity::ValidityConstraints;
use crate::{Error, Result};

/// Options for one enumeration run.
#[derive(Clone, Copy, Debug)]
pub struct EnumerationCfg<'a> {
    pub coords: NormalCoords,
    /// Requested contents; cleaned up before the run.
    pub which: NormalList,
    /// Algorithm hints; unsupported or conflicting hints are replaced.
    pub alg: NormalAlg,
    pub tracker: Option<&'a ProgressTracker>,
}

impl Default for EnumerationCfg<'_> {
    fn default() -> Self {
        Self {
            coords: NormalCoords::Standard,
            which: NormalList::EMBEDDED_ONLY | NormalList::VERTEX,
            alg: NormalAlg::empty(),
            tracker: None,
        }
    }
}

impl<'a> EnumerationCfg<'a> {
    pub fn with_coords(mut self, coords: NormalCoords) -> Self {
        self.coords = coords;
        self
    }

    pub fn with_which(mut self, which: NormalList) -> Self {
        self.which = which;
        self
    }

    pub fn with_algorithm(mut self, alg: NormalAlg) -> Self {
        self.alg = alg;
        self
    }

    pub fn with_tracker(mut self, tracker: &'a ProgressTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Enumerate on `tri`.
    ///
    /// Errors leave nothing behind. Cancellation is not an error: the list
    /// comes back with [`EnumerationStatus::Cancelled`] and whatever had been
    /// found.
    pub fn run(&self, tri: &Triangulation) -> Result<NormalSurfaces> {
        let mut which = self.which
            & (NormalList::EMBEDDED_ONLY
                | NormalList::IMMERSED_SINGULAR
                | NormalList::VERTEX
                | NormalList::FUNDAMENTAL);
        ensure_one(&mut which, &[NormalList::VERTEX, NormalList::FUNDAMENTAL]);
        ensure_one(&mut which, &[NormalList::EMBEDDED_ONLY, NormalList::IMMERSED_SINGULAR]);

        let mut list = NormalSurfaces::empty(tri, self.coords, which, NormalAlg::empty());
        let outcome = if which.contains(NormalList::VERTEX) {
            fill_vertex(&mut list, self.alg, self.tracker)
        } else {
            fill_fundamental(&mut list, self.alg, self.tracker)
        };
        match outcome {
            Ok(()) => {}
            Err(Error::Cancelled) => {
                tracing::debug!(found = list.len(), "enumeration cancelled");
                list.status = EnumerationStatus::Cancelled;
            }
            Err(e) => return Err(e),
        }
        if let Some(t) = self.tracker {
            t.set_finished();
        }
        tracing::debug!(
            coords = ?list.coords,
            which = ?list.which,
            alg = ?list.alg,
            surfaces = list.len(),
            "enumeration finished"
        );
        Ok(list)
    }
}

impl NormalSurfaces {
    /// Enumerate surfaces of kind `which` in `coords`, using `alg` as a hint.
    pub fn enumerate(
        tri: &Triangulation,
        coords: NormalCoords,
        which: NormalList,
        alg: NormalAlg,
        tracker: Option<&ProgressTracker>,
    ) -> Result<NormalSurfaces> {
        EnumerationCfg {
            coords,
            which,
            alg,
            tracker,
        }
        .run(tri)
    }

    /// Look for an almost normal 2-sphere with one octagon.
    ///
    /// Needs a valid closed triangulation. Searches standard almost normal
    /// coordinates for a surface with `χ − #octagons ≥ 1` that avoids some
    /// triangle type, then returns its octagonal component. That component
    /// is a sphere whenever the triangulation is 0-efficient; if it is not,
    /// the result is `UnsolvedCase`.
    pub fn find_almost_normal_sphere(
        tri: &Triangulation,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Option<NormalSurface>> {
        if !tri.is_valid() || !tri.is_closed() {
            return Err(Error::precondition(
                "almost normal sphere search needs a valid closed triangulation",
            ));
        }
        let coords = NormalCoords::AlmostNormal;
        let kind = choose_int(tri, coords)?;
        let found =
            tree_single::<LpConstraintEulerPositive, BanNone>(tri, coords, kind, true, tracker)?;
        let Some(v) = found else {
            return Ok(None);
        };
        let found = NormalSurface::from_coords(tri, coords, v)?;
        for part in found.components()? {
            if part.oct_position().is_none() {
                continue;
            }
            if part.is_sphere()? {
                return Ok(Some(part.with_name("almost normal sphere")));
            }
            return Err(Error::unsolved(format!("octagonal component {part} is not a sphere")));
        }
        Err(Error::unsolved("single solution search returned no octagon"))
    }
}

/// Embedded vertex surfaces in `coords`, with default algorithms.
pub fn enumerate_vertex(tri: &Triangulation, coords: NormalCoords) -> Result<NormalSurfaces> {
    EnumerationCfg::default().with_coords(coords).run(tri)
}

/// Embedded fundamental surfaces in `coords`, with default algorithms.
pub fn enumerate_fundamental(tri: &Triangulation, coords: NormalCoords) -> Result<NormalSurfaces> {
    EnumerationCfg::default()
        .with_coords(coords)
        .with_which(NormalList::EMBEDDED_ONLY | NormalList::FUNDAMENTAL)
        .run(tri)
}

/// Wrap an enumerated vector as a surface, applying the storage policy.
pub(crate) fn materialise(
    tri: &Triangulation,
    coords: NormalCoords,
    mut vec: Vec<ExactInt>,
) -> Result<NormalSurface> {
    if let Some(target) = coords.standard_counterpart() {
        if tri.is_valid() && !tri.is_ideal() {
            NormalEncoding::new(coords).reconstruct_triangles(tri, &mut vec)?;
            return NormalSurface::from_coords(tri, target, vec);
        }
    }
    NormalSurface::from_coords(tri, coords, vec)
}

fn constraints_for(coords: NormalCoords, embedded: bool, n: usize) -> ValidityConstraints {
    if embedded {
        ValidityConstraints::for_encoding(NormalEncoding::new(coords), n)
    } else {
        ValidityConstraints::none()
    }
}

fn stage(tracker: Option<&ProgressTracker>, name: &str, weight: f64) {
    if let Some(t) = tracker {
        t.new_stage(name, weight);
    }
}

/// Materialise `raw` into `list`, then hand back `outcome`.
fn collect(
    list: &mut NormalSurfaces,
    raw: Vec<Vec<ExactInt>>,
    coords: NormalCoords,
    outcome: Result<()>,
) -> Result<()> {
    let tri = list.tri.clone();
    for v in raw {
        list.push(materialise(&tri, coords, v)?);
    }
    outcome
}

/// Clean up vertex hints for `coords` on `tri`.
fn vertex_algorithm(
    hint: NormalAlg,
    coords: NormalCoords,
    embedded: bool,
    tri: &Triangulation,
) -> NormalAlg {
    let mut alg = hint
        & (NormalAlg::VERTEX_VIA_REDUCED
            | NormalAlg::VERTEX_STD_DIRECT
            | NormalAlg::VERTEX_TREE
            | NormalAlg::VERTEX_DD);
    ensure_one(&mut alg, &[NormalAlg::VERTEX_TREE, NormalAlg::VERTEX_DD]);
    if alg.contains(NormalAlg::VERTEX_TREE) && !embedded {
        alg ^= NormalAlg::VERTEX_TREE | NormalAlg::VERTEX_DD;
    }
    if coords.is_reduced() {
        alg.remove(NormalAlg::VERTEX_VIA_REDUCED | NormalAlg::VERTEX_STD_DIRECT);
    } else {
        ensure_one(&mut alg, &[NormalAlg::VERTEX_VIA_REDUCED, NormalAlg::VERTEX_STD_DIRECT]);
        let reducible = embedded && tri.is_valid() && !tri.is_ideal();
        if alg.contains(NormalAlg::VERTEX_VIA_REDUCED) && !reducible {
            alg ^= NormalAlg::VERTEX_VIA_REDUCED | NormalAlg::VERTEX_STD_DIRECT;
        }
    }
    alg
}

fn fill_vertex(
    list: &mut NormalSurfaces,
    hint: NormalAlg,
    tracker: Option<&ProgressTracker>,
) -> Result<()> {
    let tri = list.tri.clone();
    let coords = list.coords;
    let embedded = list.is_embedded_only();
    let alg = vertex_algorithm(hint, coords, embedded, &tri);
    list.alg = alg;
    tracing::debug!(?coords, ?alg, tetrahedra = tri.size(), "vertex enumeration");

    if tri.is_empty() {
        list.push(materialise(&tri, coords, Vec::new())?);
        return Ok(());
    }
    let tree = alg.contains(NormalAlg::VERTEX_TREE);
    let mut raw: Vec<Vec<ExactInt>> = Vec::new();
    let outcome = if alg.contains(NormalAlg::VERTEX_VIA_REDUCED) {
        via_reduced(&tri, coords, tree, tracker, &mut raw)
    } else {
        stage(tracker, "enumerating vertex surfaces", 1.0);
        direct_vertices(&tri, coords, embedded, tree, tracker, &mut |v| raw.push(v))
    };
    collect(list, raw, coords, outcome)
}

/// Vertex rays of the admissible cone in `coords`, by tree traversal or
/// double description.
fn direct_vertices(
    tri: &Triangulation,
    coords: NormalCoords,
    embedded: bool,
    tree: bool,
    tracker: Option<&ProgressTracker>,
    sink: &mut dyn FnMut(Vec<ExactInt>),
) -> Result<()> {
    if tree {
        let kind = choose_int(tri, coords)?;
        tracing::debug!(?coords, int = kind.name(), "tree traversal");
        if coords.is_closed_variant() {
            tree_vertices::<LpConstraintNonSpun, BanNone>(tri, coords, kind, tracker, sink)
        } else {
            tree_vertices::<LpConstraintNone, BanNone>(tri, coords, kind, tracker, sink)
        }
    } else {
        let eqns = make_matching_equations(tri, coords)?;
        let vc = constraints_for(coords, embedded, tri.size());
        tracing::debug!(?coords, rows = eqns.rows(), cols = eqns.cols(), "double description");
        enumerate_extremal_rays(&eqns, &vc, tracker, &mut *sink)
    }
}

/// Enumerate in the reduced counterpart of `coords`, then expand to
/// `coords`. A cancellation during the first pass leaves nothing.
fn via_reduced(
    tri: &Triangulation,
    coords: NormalCoords,
    tree: bool,
    tracker: Option<&ProgressTracker>,
    out: &mut Vec<Vec<ExactInt>>,
) -> Result<()> {
    let reduced = coords
        .reduced_counterpart()
        .ok_or_else(|| Error::invalid(format!("{coords:?} has no reduced counterpart")))?;
    stage(tracker, "enumerating reduced vertex surfaces", 0.5);
    let mut rays: Vec<Vec<ExactInt>> = Vec::new();
    direct_vertices(tri, reduced, true, tree, tracker, &mut |v| rays.push(v))?;
    stage(tracker, "expanding to standard coordinates", 0.5);
    tracing::debug!(reduced = rays.len(), "expanding reduced solution set");
    expand_to_standard(tri, coords, &rays, tracker, &mut |v| out.push(v))
}

fn fill_fundamental(
    list: &mut NormalSurfaces,
    hint: NormalAlg,
    tracker: Option<&ProgressTracker>,
) -> Result<()> {
    let tri = list.tri.clone();
    let coords = list.coords;
    let embedded = list.is_embedded_only();
    let hilbert = [
        NormalAlg::HILBERT_PRIMAL,
        NormalAlg::HILBERT_DUAL,
        NormalAlg::HILBERT_FULLCONE,
        NormalAlg::HILBERT_CD,
    ];
    let mut alg = hint;
    ensure_one(&mut alg, &hilbert);
    if alg.contains(NormalAlg::HILBERT_PRIMAL) && !embedded {
        tracing::debug!("primal Hilbert basis needs embedded surfaces; using dual");
        alg ^= NormalAlg::HILBERT_PRIMAL | NormalAlg::HILBERT_DUAL;
    }

    if tri.is_empty() {
        list.alg = alg & hilbert.into_iter().fold(NormalAlg::empty(), |acc, a| acc | a);
        list.push(materialise(&tri, coords, Vec::new())?);
        return Ok(());
    }

    let eqns = make_matching_equations(&tri, coords)?;
    let vc = constraints_for(coords, embedded, tri.size());
    let mut raw: Vec<Vec<ExactInt>> = Vec::new();
    let outcome = if alg.contains(NormalAlg::HILBERT_PRIMAL) {
        let which = NormalList::VERTEX | NormalList::EMBEDDED_ONLY;
        let mut vertex = NormalSurfaces::empty(&tri, coords, which, NormalAlg::empty());
        fill_vertex(&mut vertex, hint, tracker)?;
        list.alg = vertex.alg | NormalAlg::HILBERT_PRIMAL;
        stage(tracker, "expanding to a Hilbert basis", 0.5);
        let target = NormalEncoding::new(coords);
        let from = vertex.iter().next().map_or(target, NormalSurface::encoding);
        let rays = ShadowRays::new(vertex.vectors(), tri.size(), from, target)?;
        hilbert_primal(&eqns, &vc, &rays, tracker, |v| raw.push(v))
    } else {
        stage(tracker, "enumerating a Hilbert basis", 1.0);
        if alg.contains(NormalAlg::HILBERT_DUAL) {
            list.alg = NormalAlg::HILBERT_DUAL;
            hilbert_dual(&eqns, &vc, tracker, |v| raw.push(v))
        } else if alg.contains(NormalAlg::HILBERT_FULLCONE) {
            list.alg = NormalAlg::HILBERT_FULLCONE;
            hilbert_fullcone(&eqns, &vc, tracker, |v| raw.push(v))
        } else {
            list.alg = NormalAlg::HILBERT_CD;
            hilbert_cd(&eqns, &vc, tracker, |v| raw.push(v))
        }
    };
    collect(list, raw, coords, outcome)
}
