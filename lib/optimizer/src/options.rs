use crate::{
    DistinctPushdownRule, FilterAwareJoinOrderRule, FilterPushdownRule, JoinOrderRule,
    OptimizerRule, ProjectionPushdownRule,
};
use hdtq_estimation::CardinalityEstimator;
use std::sync::Arc;

/// The optimization level of the query planner.
///
/// The level selects the initial [OptimizerOptions], which can then be adjusted pass by pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OptimizationLevel {
    /// No pass runs. Plans keep the shape of the query.
    None,
    /// Cost-based join ordering, filter pushdown and projection pushdown.
    Default,
    /// All passes, including the distinct hints.
    #[default]
    Full,
}

/// How the operands of joins are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum JoinOrdering {
    Disabled,
    /// See [JoinOrderRule].
    #[default]
    CostBased,
    /// See [FilterAwareJoinOrderRule]. Replaces filter pushdown.
    FilterAware { penalty_ratio: f64 },
}

/// Selects the passes of the optimizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimizerOptions {
    pub join_ordering: JoinOrdering,
    pub filter_pushdown: bool,
    pub projection_pushdown: bool,
    pub distinct_pushdown: bool,
}

impl OptimizerOptions {
    pub fn from_level(level: OptimizationLevel) -> Self {
        match level {
            OptimizationLevel::None => Self {
                join_ordering: JoinOrdering::Disabled,
                filter_pushdown: false,
                projection_pushdown: false,
                distinct_pushdown: false,
            },
            OptimizationLevel::Default => Self {
                join_ordering: JoinOrdering::CostBased,
                filter_pushdown: true,
                projection_pushdown: true,
                distinct_pushdown: false,
            },
            OptimizationLevel::Full => Self {
                join_ordering: JoinOrdering::CostBased,
                filter_pushdown: true,
                projection_pushdown: true,
                distinct_pushdown: true,
            },
        }
    }
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self::from_level(OptimizationLevel::default())
    }
}

impl From<OptimizationLevel> for OptimizerOptions {
    fn from(level: OptimizationLevel) -> Self {
        Self::from_level(level)
    }
}

/// Creates the list of optimizer rules selected by `options`.
///
/// Filter pushdown is left out if [JoinOrdering::FilterAware] is selected.
pub fn create_optimizer_rules(
    estimator: Arc<dyn CardinalityEstimator>,
    options: &OptimizerOptions,
) -> Vec<Arc<dyn OptimizerRule>> {
    let mut rules: Vec<Arc<dyn OptimizerRule>> = Vec::new();

    match options.join_ordering {
        JoinOrdering::Disabled => {
            if options.filter_pushdown {
                rules.push(Arc::new(FilterPushdownRule::new()));
            }
        }
        JoinOrdering::CostBased => {
            rules.push(Arc::new(JoinOrderRule::new(estimator)));
            if options.filter_pushdown {
                rules.push(Arc::new(FilterPushdownRule::new()));
            }
        }
        JoinOrdering::FilterAware { penalty_ratio } => {
            rules.push(Arc::new(FilterAwareJoinOrderRule::new(
                estimator,
                penalty_ratio,
            )));
        }
    }

    if options.projection_pushdown {
        rules.push(Arc::new(ProjectionPushdownRule::new()));
    }
    if options.distinct_pushdown {
        rules.push(Arc::new(DistinctPushdownRule::new()));
    }
    rules
}
