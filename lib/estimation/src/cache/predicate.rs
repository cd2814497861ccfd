use crate::cache::{EstimateCache, MaxEstimate};
use crate::peek::peek;
use datafusion::common::stats::Precision;
use hdtq_common::{DFResult, EncodedTriplePattern, TripleIndex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Caches the estimates of `?s <p> ?o` patterns by the predicate id.
///
/// Predicate ids are dense, starting from 1, so entries live in a fixed-size array. Predicates
/// beyond the configured size are estimated on each call.
#[derive(Debug)]
pub struct PredicateCache {
    index: Arc<dyn TripleIndex>,
    entries: Box<[OnceLock<Precision<u64>>]>,
    max: MaxEstimate,
}

impl PredicateCache {
    pub fn new(index: Arc<dyn TripleIndex>, predicates: u64, max_size: usize) -> Self {
        let size = usize::try_from(predicates).unwrap_or(usize::MAX).min(max_size);
        let entries = (0..size).map(|_| OnceLock::new()).collect();
        Self {
            index,
            entries,
            max: MaxEstimate::default(),
        }
    }

    /// The number of predicates that can be cached.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Returns the memoized estimate for `predicate` without computing it.
    pub fn cached(&self, predicate: u64) -> Option<Precision<u64>> {
        self.entry(predicate).and_then(|entry| entry.get().copied())
    }

    fn entry(&self, predicate: u64) -> Option<&OnceLock<Precision<u64>>> {
        let slot = usize::try_from(predicate.checked_sub(1)?).ok()?;
        self.entries.get(slot)
    }

    fn compute(&self, predicate: u64) -> DFResult<Precision<u64>> {
        let estimate = peek(
            self.index.as_ref(),
            EncodedTriplePattern::new(None, Some(predicate), None),
        )?;
        self.max.observe(estimate);
        Ok(estimate)
    }
}

impl EstimateCache for PredicateCache {
    fn name(&self) -> &'static str {
        "predicate"
    }

    fn get(&self, predicate: u64) -> DFResult<Precision<u64>> {
        let Some(entry) = self.entry(predicate) else {
            return self.compute(predicate);
        };
        if let Some(estimate) = entry.get() {
            return Ok(*estimate);
        }
        let estimate = self.compute(predicate)?;
        Ok(*entry.get_or_init(|| estimate))
    }

    fn normalized(&self, predicate: u64) -> f64 {
        self.max.normalize(self.cached(predicate))
    }

    fn prefetch(&self, stop: &AtomicBool) -> DFResult<usize> {
        let mut visited = 0;
        for predicate in (1..).take(self.entries.len()) {
            if stop.load(Ordering::Acquire) {
                break;
            }
            self.get(predicate)?;
            visited += 1;
        }
        Ok(visited)
    }
}
