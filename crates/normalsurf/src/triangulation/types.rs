//! Tetrahedra, gluings and the copy-on-write triangulation handle.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::skeleton::Skeleton;
use crate::matching::PeripheralCurves;
use crate::perm::Perm4;
use crate::{Error, Result};

/// One tetrahedron: for each face, the tetrahedron it is glued to and the
/// vertex map (vertex `i` here is vertex `gluing[i]` there).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tetrahedron {
    pub(crate) adj: [Option<(usize, Perm4)>; 4],
}

impl Tetrahedron {
    pub fn adjacent(&self, face: usize) -> Option<(usize, Perm4)> {
        self.adj[face]
    }

    pub fn has_boundary(&self) -> bool {
        self.adj.iter().any(Option::is_none)
    }
}

#[derive(Clone, Default)]
pub(crate) struct TriData {
    pub(crate) tets: Vec<Tetrahedron>,
    pub(crate) skeleton: OnceLock<Skeleton>,
    pub(crate) peripheral: Option<Arc<dyn PeripheralCurves>>,
}

/// A 3-manifold triangulation.
///
/// Cloning is cheap and shares the underlying image. Mutation goes through
/// `Arc::make_mut`, so a clone taken earlier (for instance the snapshot a
/// surface holds) keeps observing the old image.
#[derive(Clone, Default)]
pub struct Triangulation {
    pub(crate) data: Arc<TriData>,
}

impl Triangulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangulation with `n` unglued tetrahedra.
    pub fn with_size(n: usize) -> Self {
        let mut t = Self::new();
        t.new_tetrahedra(n);
        t
    }

    pub fn size(&self) -> usize {
        self.data.tets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.tets.is_empty()
    }

    pub fn tetrahedron(&self, i: usize) -> &Tetrahedron {
        &self.data.tets[i]
    }

    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.data.tets
    }

    pub fn adjacent(&self, tet: usize, face: usize) -> Option<(usize, Perm4)> {
        self.data.tets[tet].adj[face]
    }

    pub fn adjacent_tet(&self, tet: usize, face: usize) -> Option<usize> {
        self.adjacent(tet, face).map(|(t, _)| t)
    }

    /// Frozen image for a surface to hold on to.
    pub fn snapshot(&self) -> Triangulation {
        self.clone()
    }

    /// Whether both handles observe the same image.
    pub fn shares_snapshot(&self, other: &Triangulation) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    fn data_mut(&mut self) -> &mut TriData {
        let d = Arc::make_mut(&mut self.data);
        d.skeleton = OnceLock::new();
        // Peripheral functionals describe one exact gluing pattern.
        d.peripheral = None;
        d
    }

    pub fn new_tetrahedron(&mut self) -> usize {
        let d = self.data_mut();
        d.tets.push(Tetrahedron::default());
        d.tets.len() - 1
    }

    /// Build from a list of gluings `(tet, face, dest, gluing)`, each given once.
    pub fn from_gluings(n: usize, gluings: &[(usize, usize, usize, Perm4)]) -> Result<Self> {
        let mut t = Self::with_size(n);
        for &(tet, face, dest, g) in gluings {
            t.join(tet, face, dest, g)?;
        }
        Ok(t)
    }

    /// Fixed gluing tables known to be consistent (catalog entries).
    pub(crate) fn from_table(n: usize, gluings: &[(usize, usize, usize, Perm4)]) -> Self {
        let mut t = Self::with_size(n);
        let d = t.data_mut();
        for &(tet, face, dest, g) in gluings {
            d.tets[tet].adj[face] = Some((dest, g));
            d.tets[dest].adj[g.apply(face)] = Some((tet, g.inverse()));
        }
        t
    }

    /// Append `k` tetrahedra and return the index of the first.
    pub fn new_tetrahedra(&mut self, k: usize) -> usize {
        let d = self.data_mut();
        let first = d.tets.len();
        d.tets.resize(first + k, Tetrahedron::default());
        first
    }

    /// Glue `face` of `tet` to face `gluing[face]` of `dest`.
    pub fn join(&mut self, tet: usize, face: usize, dest: usize, gluing: Perm4) -> Result<()> {
        let n = self.size();
        if tet >= n || dest >= n || face > 3 {
            return Err(Error::invalid(format!("join({tet}, {face}, {dest}): index out of range")));
        }
        let dest_face = gluing.apply(face);
        if tet == dest && dest_face == face {
            return Err(Error::invalid(format!("join: face {face} of {tet} glued to itself")));
        }
        let tets = &self.data.tets;
        if tets[tet].adj[face].is_some() || tets[dest].adj[dest_face].is_some() {
            return Err(Error::invalid(format!(
                "join: face {face} of {tet} or face {dest_face} of {dest} already glued"
            )));
        }
        let d = self.data_mut();
        d.tets[tet].adj[face] = Some((dest, gluing));
        d.tets[dest].adj[dest_face] = Some((tet, gluing.inverse()));
        Ok(())
    }

    /// Unglue `face` of `tet`; returns the old partner.
    pub fn unjoin(&mut self, tet: usize, face: usize) -> Option<(usize, Perm4)> {
        let (dest, g) = self.data.tets[tet].adj[face]?;
        let d = self.data_mut();
        d.tets[tet].adj[face] = None;
        d.tets[dest].adj[g.apply(face)] = None;
        Some((dest, g))
    }

    /// Remove a tetrahedron, ungluing it first; later indices shift down by one.
    pub fn remove_tetrahedron(&mut self, tet: usize) {
        for f in 0..4 {
            self.unjoin(tet, f);
        }
        let d = self.data_mut();
        d.tets.remove(tet);
        for t in d.tets.iter_mut() {
            for a in t.adj.iter_mut().flatten() {
                if a.0 > tet {
                    a.0 -= 1;
                }
            }
        }
    }

    /// Append a copy of `other`; returns the index offset of the copy.
    pub fn insert_triangulation(&mut self, other: &Triangulation) -> usize {
        let offset = self.size();
        let d = self.data_mut();
        for t in &other.data.tets {
            let mut c = t.clone();
            for a in c.adj.iter_mut().flatten() {
                a.0 += offset;
            }
            d.tets.push(c);
        }
        offset
    }

    /// Attach the oracle used by the closed (non-spun) coordinate systems.
    pub fn set_peripheral_curves(&mut self, oracle: Arc<dyn PeripheralCurves>) {
        Arc::make_mut(&mut self.data).peripheral = Some(oracle);
    }

    pub fn peripheral_curves(&self) -> Option<&Arc<dyn PeripheralCurves>> {
        self.data.peripheral.as_ref()
    }

    pub(crate) fn skeleton(&self) -> &Skeleton {
        self.data.skeleton.get_or_init(|| Skeleton::build(&self.data.tets))
    }
}

impl PartialEq for Triangulation {
    fn eq(&self, other: &Self) -> bool {
        self.shares_snapshot(other) || self.data.tets == other.data.tets
    }
}

impl Eq for Triangulation {}

impl fmt::Debug for Triangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut l = f.debug_list();
        for t in &self.data.tets {
            l.entry(&t.adj);
        }
        l.finish()
    }
}
