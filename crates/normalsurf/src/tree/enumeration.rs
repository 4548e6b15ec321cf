use std::collections::HashSet;
use std::marker::PhantomData;

use super::octagon_columns;
use crate::encoding::NormalCoords;
use crate::int::{ExactInt, LpInt};
use crate::lp::{BanConstraint, LpConstraint, LpData, LpInitialTableaux};
use crate::progress::{poll, ProgressTracker};
use crate::triangulation::Triangulation;
use crate::Result;

/// Vertex enumeration by tree traversal.
///
/// A node passes if its tableau is feasible and its type vector does not
/// dominate one already found (`found[i] ∈ {0, types[i]}` for all `i`).
/// Leaves that pass are vertex surfaces; the all-zero leaf is skipped.
#[derive(Debug)]
pub struct TreeEnumeration<C: LpConstraint, B: BanConstraint, T: LpInt> {
    init: LpInitialTableaux<C>,
    n: usize,
    n_types: usize,
    octagons: bool,
    types: Vec<u8>,
    found: Vec<Vec<u8>>,
    /// Vectors not to report again (after a retry in a wider type).
    skip: HashSet<Vec<ExactInt>>,
    visited: u64,
    _marker: PhantomData<fn() -> (B, T)>,
}

impl<C: LpConstraint, B: BanConstraint, T: LpInt> TreeEnumeration<C, B, T> {
    pub fn new(tri: &Triangulation, coords: NormalCoords) -> Result<Self> {
        let init = LpInitialTableaux::<C>::new(tri, coords)?;
        let n = tri.size();
        let n_types = if init.has_triangles() { 5 * n } else { n };
        Ok(Self {
            octagons: init.allows_octagons(),
            init,
            n,
            n_types,
            types: vec![0; n_types],
            found: Vec::new(),
            skip: HashSet::new(),
            visited: 0,
            _marker: PhantomData,
        })
    }

    /// Do not report these vectors again.
    pub fn with_skip(mut self, skip: HashSet<Vec<ExactInt>>) -> Self {
        self.skip = skip;
        self
    }

    /// Nodes examined so far.
    pub fn visited(&self) -> u64 {
        self.visited
    }

    /// Type vectors of the solutions found so far.
    pub fn solutions(&self) -> &[Vec<u8>] {
        &self.found
    }

    /// Run the search, passing each vertex surface vector to `sink`.
    /// Returns the number of solutions found (including skipped ones).
    pub fn run(
        &mut self,
        tracker: Option<&ProgressTracker>,
        sink: &mut dyn FnMut(Vec<ExactInt>),
    ) -> Result<usize> {
        let root = LpData::<C, T>::init_start::<B>(&self.init)?;
        self.visited += 1;
        if root.is_feasible() && self.n_types > 0 {
            self.descend(0, root, false, tracker, sink)?;
        }
        tracing::debug!(
            bundle = C::NAME,
            int = T::NAME,
            visited = self.visited,
            solutions = self.found.len(),
            "tree enumeration"
        );
        Ok(self.found.len())
    }

    fn dominates_found(&self) -> bool {
        self.found.iter().any(|s| {
            s.iter()
                .zip(&self.types)
                .all(|(&f, &t)| f == 0 || f == t)
        })
    }

    /// Branch on level `level`, given the (feasible) tableau of its parent.
    fn descend(
        &mut self,
        level: usize,
        mut lp: LpData<C, T>,
        oct_used: bool,
        tracker: Option<&ProgressTracker>,
        sink: &mut dyn FnMut(Vec<ExactInt>),
    ) -> Result<()> {
        poll(tracker)?;
        if level >= self.n {
            let col = 2 * self.n + level;
            let mut positive = lp.clone();
            lp.constrain_zero(col)?;
            self.visit(level, lp, oct_used, tracker, sink)?;

            self.types[level] = 1;
            if !self.dominates_found() {
                positive.constrain_positive(col)?;
                self.visit(level, positive, oct_used, tracker, sink)?;
            }
            self.types[level] = 0;
            return Ok(());
        }

        let k = level;
        let allow_oct = self.octagons && !oct_used;
        // Clones for the non-zero types, taken as the zero constraints are
        // added so each one inherits as much work as possible.
        let mut children: Vec<(u8, LpData<C, T>)> = Vec::with_capacity(6);
        children.push((1, lp.clone()));
        if allow_oct {
            children.push((5, lp.clone()));
            children.push((6, lp.clone()));
        }
        lp.constrain_zero(3 * k)?;
        children.push((2, lp.clone()));
        if allow_oct {
            children.push((4, lp.clone()));
        }
        lp.constrain_zero(3 * k + 1)?;
        children.push((3, lp.clone()));
        lp.constrain_zero(3 * k + 2)?;
        children.sort_by_key(|(t, _)| *t);

        self.visit(level, lp, oct_used, tracker, sink)?;

        for (ty, mut child) in children {
            self.types[k] = ty;
            if self.dominates_found() {
                continue;
            }
            match ty {
                1 => {
                    child.constrain_zero(3 * k + 1)?;
                    child.constrain_zero(3 * k + 2)?;
                    child.constrain_positive(3 * k)?;
                }
                2 => {
                    child.constrain_zero(3 * k + 2)?;
                    child.constrain_positive(3 * k + 1)?;
                }
                3 => child.constrain_positive(3 * k + 2)?,
                _ => {
                    let (zero, a, b) = octagon_columns(k, usize::from(ty - 4));
                    child.constrain_zero(zero)?;
                    child.constrain_oct(a, b)?;
                }
            }
            self.visit(level, child, oct_used || ty >= 4, tracker, sink)?;
        }
        self.types[k] = 0;
        Ok(())
    }

    /// Test the node at `level` whose type has just been fixed.
    fn visit(
        &mut self,
        level: usize,
        lp: LpData<C, T>,
        oct_used: bool,
        tracker: Option<&ProgressTracker>,
        sink: &mut dyn FnMut(Vec<ExactInt>),
    ) -> Result<()> {
        self.visited += 1;
        let leaf = level + 1 == self.n_types;
        if leaf && self.types.iter().all(|&t| t == 0) {
            return Ok(());
        }
        if !lp.is_feasible() {
            return Ok(());
        }
        if !leaf {
            return self.descend(level + 1, lp, oct_used, tracker, sink);
        }
        self.found.push(self.types.clone());
        let v = lp.extract_solution(&self.init)?;
        tracing::trace!(solution = self.found.len(), visited = self.visited, "tree leaf");
        if !self.skip.contains(&v) {
            sink(v);
        }
        Ok(())
    }
}
