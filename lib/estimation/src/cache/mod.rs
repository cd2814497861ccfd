//! Memoized index probes for the most frequent pattern shapes.

mod class;
mod predicate;

pub use class::ClassCache;
pub use predicate::PredicateCache;

use datafusion::common::stats::Precision;
use hdtq_common::DFResult;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A cache of index estimates keyed by a dictionary id.
///
/// Entries are computed on demand and may be computed concurrently. As computing an entry is a
/// deterministic index probe, concurrent computations agree on the value.
pub trait EstimateCache: Debug + Send + Sync {
    /// A short name used in logs and thread names.
    fn name(&self) -> &'static str;

    /// Returns the estimate for `id`, computing it if necessary.
    fn get(&self, id: u64) -> DFResult<Precision<u64>>;

    /// Returns how large the cached estimate for `id` is compared to the largest estimate seen
    /// so far, in `[0, 1]`.
    ///
    /// Returns 1 if nothing is known about `id`. Never computes an entry.
    fn normalized(&self, id: u64) -> f64;

    /// Computes all entries until done or until `stop` is set. Returns the number of entries
    /// visited.
    fn prefetch(&self, stop: &AtomicBool) -> DFResult<usize>;
}

/// Tracks the largest estimate observed by a cache.
#[derive(Debug, Default)]
struct MaxEstimate(AtomicU64);

impl MaxEstimate {
    fn observe(&self, estimate: Precision<u64>) {
        if let Some(value) = estimate.get_value() {
            self.0.fetch_max(*value, Ordering::Relaxed);
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "Normalized values are only used for weighting"
    )]
    fn normalize(&self, estimate: Option<Precision<u64>>) -> f64 {
        let Some(value) = estimate.as_ref().and_then(Precision::get_value) else {
            return 1.0;
        };
        let max = self.0.load(Ordering::Relaxed);
        if *value >= max {
            return 1.0;
        }
        *value as f64 / max as f64
    }
}
