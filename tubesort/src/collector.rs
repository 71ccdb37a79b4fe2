//! Aggregation of solver output into the shortest solutions.
//!
//! The solver reports solutions in no particular order. `ShortestCollector`
//! keeps the bound of the shortest solution seen so far and lets a stopper read
//! it, so the search stops expanding branches that can no longer win.

use crate::mover::Step;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Thread-safe collector of the shortest solutions.
///
/// # Examples
/// ```
/// use tubesort::collector::ShortestCollector;
/// use tubesort::mover::Step;
///
/// let collector = ShortestCollector::new();
/// let long = vec![Step::new(0, 1).unwrap(), Step::new(1, 2).unwrap()];
/// let short = vec![Step::new(2, 0).unwrap()];
///
/// assert!(collector.offer(long.clone()));
/// assert!(collector.offer(short.clone()));
/// assert!(!collector.offer(long));
/// assert_eq!(collector.best(), vec![short]);
/// ```
#[derive(Debug)]
pub struct ShortestCollector {
    shortest: AtomicUsize,
    kept: Mutex<HashSet<Vec<Step>>>,
}

impl Default for ShortestCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortestCollector {
    pub fn new() -> Self {
        ShortestCollector {
            shortest: AtomicUsize::new(usize::MAX),
            kept: Mutex::new(HashSet::new()),
        }
    }

    /// Offers a solution.
    ///
    /// The solution is kept when it is not longer than the shortest one seen so
    /// far, including itself.
    ///
    /// # Returns
    /// `true` if the solution was kept and was not already known.
    pub fn offer(&self, steps: Vec<Step>) -> bool {
        let len = steps.len();
        let previous = self.shortest.fetch_min(len, Ordering::AcqRel);
        if len > previous {
            return false;
        }
        self.kept
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(steps)
    }

    /// Returns the length of the shortest solution seen so far.
    pub fn shortest(&self) -> Option<usize> {
        match self.shortest.load(Ordering::Acquire) {
            usize::MAX => None,
            len => Some(len),
        }
    }

    /// Checks whether a branch holding `steps` has reached the shortest solution.
    ///
    /// Children of such a branch are longer than the best known solution, so a
    /// stopper can cut it off.
    pub fn exceeds(&self, steps: &[Step]) -> bool {
        steps.len() >= self.shortest.load(Ordering::Acquire)
    }

    /// Returns every kept solution of the shortest length, sorted.
    pub fn best(&self) -> Vec<Vec<Step>> {
        let Some(shortest) = self.shortest() else {
            return Vec::new();
        };
        let kept = self.kept.lock().unwrap_or_else(PoisonError::into_inner);
        let mut best: Vec<Vec<Step>> = kept
            .iter()
            .filter(|steps| steps.len() == shortest)
            .cloned()
            .collect();
        best.sort();
        best
    }
}
