use crate::cache::{EstimateCache, MaxEstimate};
use crate::peek::peek;
use dashmap::DashMap;
use datafusion::common::stats::Precision;
use hdtq_common::{DFResult, EncodedTriplePattern, TripleIndex};
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Caches the estimates of `?s rdf:type <C>` patterns by the class id.
///
/// The number of entries is capped. Once full, new classes are estimated on each call.
#[derive(Debug)]
pub struct ClassCache {
    index: Arc<dyn TripleIndex>,
    /// The id of `rdf:type`. Without it, no triple has a class.
    rdf_type: Option<u64>,
    capacity: usize,
    entries: DashMap<u64, Precision<u64>, FxBuildHasher>,
    max: MaxEstimate,
    overflow_reported: AtomicBool,
}

impl ClassCache {
    pub fn new(index: Arc<dyn TripleIndex>, rdf_type: Option<u64>, capacity: usize) -> Self {
        Self {
            index,
            rdf_type,
            capacity,
            entries: DashMap::with_hasher(FxBuildHasher),
            max: MaxEstimate::default(),
            overflow_reported: AtomicBool::new(false),
        }
    }

    /// The number of memoized classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the memoized estimate for `class` without computing it.
    pub fn cached(&self, class: u64) -> Option<Precision<u64>> {
        self.entries.get(&class).map(|entry| *entry)
    }

    fn insert(&self, class: u64, estimate: Precision<u64>) -> Precision<u64> {
        if self.entries.len() < self.capacity {
            return *self.entries.entry(class).or_insert(estimate);
        }
        if !self.overflow_reported.swap(true, Ordering::Relaxed) {
            warn!(
                capacity = self.capacity,
                "Class cache is full, further class estimates are not cached"
            );
        }
        estimate
    }
}

impl EstimateCache for ClassCache {
    fn name(&self) -> &'static str {
        "class"
    }

    fn get(&self, class: u64) -> DFResult<Precision<u64>> {
        let Some(rdf_type) = self.rdf_type else {
            return Ok(Precision::Exact(0));
        };
        if let Some(estimate) = self.cached(class) {
            return Ok(estimate);
        }

        let estimate = peek(
            self.index.as_ref(),
            EncodedTriplePattern::new(None, Some(rdf_type), Some(class)),
        )?;
        self.max.observe(estimate);
        Ok(self.insert(class, estimate))
    }

    fn normalized(&self, class: u64) -> f64 {
        self.max.normalize(self.cached(class))
    }

    fn prefetch(&self, stop: &AtomicBool) -> DFResult<usize> {
        let Some(rdf_type) = self.rdf_type else {
            return Ok(0);
        };

        let mut classes = FxHashSet::default();
        for triple in self
            .index
            .search(EncodedTriplePattern::new(None, Some(rdf_type), None))?
        {
            if stop.load(Ordering::Acquire) {
                return Ok(0);
            }
            classes.insert(triple.object);
        }

        let mut visited = 0;
        for class in classes {
            if stop.load(Ordering::Acquire) {
                break;
            }
            self.get(class)?;
            visited += 1;
        }
        Ok(visited)
    }
}
