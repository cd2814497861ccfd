use hdtq_estimation::EstimatorOptions;
use hdtq_optimizer::OptimizerOptions;

/// Options for SPARQL query planning.
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    /// The optimizer passes to run.
    pub optimizer: OptimizerOptions,
    /// The cardinality estimator used by the passes.
    pub estimator: EstimatorOptions,
}
