//! Caller-supplied surface predicates.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::NormalSurfaces;
use crate::int::ExactInt;
use crate::surface::NormalSurface;

/// A predicate on surfaces. Closures `Fn(&NormalSurface) -> bool` are
/// filters too.
pub trait SurfaceFilter {
    fn accept(&self, s: &NormalSurface) -> bool;
}

impl<F> SurfaceFilter for F
where
    F: Fn(&NormalSurface) -> bool,
{
    fn accept(&self, s: &NormalSurface) -> bool {
        self(s)
    }
}

/// A subset of `{true, false}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolSet {
    #[default]
    Both,
    True,
    False,
    Neither,
}

impl BoolSet {
    pub fn contains(self, b: bool) -> bool {
        match self {
            BoolSet::Both => true,
            BoolSet::True => b,
            BoolSet::False => !b,
            BoolSet::Neither => false,
        }
    }

    pub fn only(b: bool) -> Self {
        if b {
            BoolSet::True
        } else {
            BoolSet::False
        }
    }
}

/// Accepts surfaces by basic properties.
///
/// An empty Euler set allows any Euler characteristic. A surface whose
/// orientability or Euler characteristic is asked about but cannot be
/// computed (a spun surface, say) is rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterProperties {
    pub euler: BTreeSet<ExactInt>,
    pub orientability: BoolSet,
    pub compactness: BoolSet,
    pub real_boundary: BoolSet,
}

impl FilterProperties {
    pub fn with_euler<I: IntoIterator<Item = ExactInt>>(mut self, values: I) -> Self {
        self.euler.extend(values);
        self
    }

    pub fn with_orientability(mut self, set: BoolSet) -> Self {
        self.orientability = set;
        self
    }

    pub fn with_compactness(mut self, set: BoolSet) -> Self {
        self.compactness = set;
        self
    }

    pub fn with_real_boundary(mut self, set: BoolSet) -> Self {
        self.real_boundary = set;
        self
    }
}

impl SurfaceFilter for FilterProperties {
    fn accept(&self, s: &NormalSurface) -> bool {
        if !self.compactness.contains(s.is_compact()) {
            return false;
        }
        if !self.real_boundary.contains(s.has_real_boundary()) {
            return false;
        }
        if self.orientability != BoolSet::Both {
            match s.is_orientable() {
                Ok(o) if self.orientability.contains(o) => {}
                _ => return false,
            }
        }
        if !self.euler.is_empty() {
            match s.euler_char() {
                Ok(x) if self.euler.contains(&x) => {}
                _ => return false,
            }
        }
        true
    }
}

/// All (or any) of a set of filters. With no children, `and` accepts
/// everything and `or` nothing.
#[derive(Default)]
pub struct FilterCombination {
    uses_and: bool,
    children: Vec<Box<dyn SurfaceFilter + Send + Sync>>,
}

impl FilterCombination {
    pub fn all() -> Self {
        Self {
            uses_and: true,
            children: Vec::new(),
        }
    }

    pub fn any() -> Self {
        Self {
            uses_and: false,
            children: Vec::new(),
        }
    }

    pub fn with(mut self, child: impl SurfaceFilter + Send + Sync + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn uses_and(&self) -> bool {
        self.uses_and
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Debug for FilterCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCombination")
            .field("uses_and", &self.uses_and)
            .field("children", &self.children.len())
            .finish()
    }
}

impl SurfaceFilter for FilterCombination {
    fn accept(&self, s: &NormalSurface) -> bool {
        if self.uses_and {
            self.children.iter().all(|c| c.accept(s))
        } else {
            self.children.iter().any(|c| c.accept(s))
        }
    }
}

impl NormalSurfaces {
    /// The members accepted by `filter`, in order. The new list is marked
    /// custom.
    pub fn filter(&self, filter: &dyn SurfaceFilter) -> NormalSurfaces {
        let mut out = self.filtered_shell();
        for s in self.iter().filter(|s| filter.accept(s)) {
            out.push(s.clone());
        }
        out
    }
}
