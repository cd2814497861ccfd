use crate::{CardinalityEstimator, ConstantEstimator, LookupMode, PatternEstimator, PeekEstimator};
use hdtq_common::{DFResult, TripleIndex};
use std::sync::Arc;

/// The available [CardinalityEstimator]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EstimatorKind {
    /// See [ConstantEstimator].
    Constant,
    /// See [PatternEstimator].
    Pattern,
    /// See [PeekEstimator].
    #[default]
    Peek,
}

/// Configures the cardinality estimator of a query planner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EstimatorOptions {
    pub kind: EstimatorKind,
    /// Only used by [EstimatorKind::Peek].
    pub lookup: LookupMode,
    /// Whether the caches are filled in the background once the estimator is created.
    pub prefetch: bool,
    /// The maximum number of predicates in the predicate cache.
    pub predicate_cache_size: usize,
    /// The maximum number of classes in the class cache.
    pub class_cache_capacity: usize,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            kind: EstimatorKind::default(),
            lookup: LookupMode::default(),
            prefetch: false,
            predicate_cache_size: 65_536,
            class_cache_capacity: 16_384,
        }
    }
}

/// Creates the estimator described by `options` over `index`.
///
/// Starts prefetching if configured. The prefetch threads are stopped when the estimator is
/// dropped.
pub fn create_estimator(
    index: Arc<dyn TripleIndex>,
    options: &EstimatorOptions,
) -> DFResult<Arc<dyn CardinalityEstimator>> {
    let estimator: Arc<dyn CardinalityEstimator> = match options.kind {
        EstimatorKind::Constant => Arc::new(ConstantEstimator),
        EstimatorKind::Pattern => Arc::new(PatternEstimator),
        EstimatorKind::Peek => {
            let estimator = PeekEstimator::try_new(index, options)?;
            if options.prefetch {
                estimator.start_prefetch()?;
            }
            Arc::new(estimator)
        }
    };
    Ok(estimator)
}
