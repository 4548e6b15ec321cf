//! Progress reporting and cooperative cancellation.
//!
//! The controller owns the tracker (usually behind an `Arc`) and calls
//! [`ProgressTracker::cancel`]; the enumerator only reads it. Stage changes are
//! also logged through `tracing` so a CLI run shows where time goes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ProgressTracker {
    cancelled: AtomicBool,
    finished: AtomicBool,
    stage: Mutex<Stage>,
}

/// Snapshot of the current stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stage {
    pub name: String,
    /// Fraction of the whole run this stage accounts for.
    pub weight: f64,
    /// Sum of the weights of completed stages.
    pub completed: f64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new stage; the previous stage counts as complete.
    pub fn new_stage(&self, name: &str, weight: f64) {
        if let Ok(mut st) = self.stage.lock() {
            st.completed += st.weight;
            st.name = name.to_string();
            st.weight = weight;
        }
        tracing::debug!(stage = name, weight, "progress stage");
    }

    pub fn stage(&self) -> Stage {
        self.stage.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn set_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

/// Poll an optional tracker. Engines call this once per outer iteration.
#[inline]
pub(crate) fn poll(tracker: Option<&ProgressTracker>) -> crate::Result<()> {
    match tracker {
        Some(t) if t.is_cancelled() => Err(crate::Error::Cancelled),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn stages_accumulate_weight() {
        let t = ProgressTracker::new();
        t.new_stage("a", 0.25);
        t.new_stage("b", 0.75);
        let s = t.stage();
        assert_eq!(s.name, "b");
        assert!((s.completed - 0.25).abs() < 1e-12);
    }

    #[test]
    fn cancel_is_visible_across_threads() {
        let t = Arc::new(ProgressTracker::new());
        let t2 = Arc::clone(&t);
        std::thread::spawn(move || t2.cancel()).join().unwrap();
        assert!(t.is_cancelled());
        assert_eq!(poll(Some(&t)), Err(crate::Error::Cancelled));
        assert_eq!(poll(None), Ok(()));
    }
}
