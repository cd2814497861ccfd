use hdtq_algebra::Op;
use hdtq_common::DFResult;
use hdtq_estimation::CardinalityEstimator;

/// Estimates the cost of evaluating `op` for ordering it among the operands of a join.
///
/// `Minus`, `Exists` and `NotExists` cost as much as their main operand. Other composite nodes
/// cost the sum of their children.
pub fn estimate_cost(op: &Op, estimator: &dyn CardinalityEstimator) -> DFResult<u64> {
    match op {
        Op::TriplePattern(pattern) => estimator.estimate(pattern),
        Op::Minus(node) | Op::Exists(node) | Op::NotExists(node) => {
            estimate_cost(node.main(), estimator)
        }
        _ => op.children().into_iter().try_fold(0u64, |cost, child| {
            Ok(cost.saturating_add(estimate_cost(child, estimator)?))
        }),
    }
}
