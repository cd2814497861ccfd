use crate::sparql::lower_query;
use crate::{QueryExplanation, QueryOptions, QueryPlanningError};
use hdtq_algebra::{flatten, Op};
use hdtq_common::{DFResult, TripleIndex};
use hdtq_estimation::{create_estimator, CardinalityEstimator};
use hdtq_optimizer::{create_optimizer_rules, Optimizer};
use spargebra::Query;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Plans SPARQL queries against a [TripleIndex].
///
/// The planner owns the cardinality estimator. If prefetching is configured, it runs in the
/// background until the planner is dropped.
#[derive(Debug)]
pub struct QueryPlanner {
    estimator: Arc<dyn CardinalityEstimator>,
    optimizer: Optimizer,
}

impl QueryPlanner {
    /// Creates a new [QueryPlanner].
    ///
    /// Fails if the estimator cannot read the statistics of `index`.
    pub fn try_new(
        index: Arc<dyn TripleIndex>,
        options: QueryOptions,
    ) -> Result<Self, QueryPlanningError> {
        let estimator = create_estimator(index, &options.estimator)?;
        let rules = create_optimizer_rules(Arc::clone(&estimator), &options.optimizer);
        Ok(Self {
            estimator,
            optimizer: Optimizer::new(rules),
        })
    }

    /// The estimator used for ordering joins.
    pub fn estimator(&self) -> &Arc<dyn CardinalityEstimator> {
        &self.estimator
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    /// Parses, lowers and optimizes `query`.
    pub fn plan(&self, query: &str) -> Result<QueryExplanation, QueryPlanningError> {
        let planning_time_start = Instant::now();
        let query = Query::parse(query, None)?;
        let initial_plan = lower_query(&query)?;
        let optimized_plan = self.optimize(Arc::clone(&initial_plan))?;
        let planning_time = planning_time_start.elapsed();

        debug!(?planning_time, "Planned SPARQL query");
        Ok(QueryExplanation {
            planning_time,
            initial_plan,
            optimized_plan,
        })
    }

    /// Flattens and optimizes an algebra tree.
    pub fn optimize(&self, op: Arc<Op>) -> DFResult<Arc<Op>> {
        let flattened = flatten(op)?;
        Ok(self.optimizer.optimize(flattened.data)?.data)
    }
}
