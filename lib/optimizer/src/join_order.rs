use crate::cost::estimate_cost;
use crate::rule::{rebuild, JOIN_ORDER_PRIORITY};
use crate::OptimizerRule;
use datafusion::common::tree_node::{Transformed, TreeNode};
use hdtq_algebra::vars::{contains_all, extend_distinct, intersects};
use hdtq_algebra::{NaryNode, Op, SemiJoinNode};
use hdtq_common::DFResult;
use hdtq_estimation::CardinalityEstimator;
use hdtq_model::Variable;
use std::sync::Arc;

/// Orders the operands of every `Join` by their estimated cost.
///
/// Operands are sorted ascending by cost, ties are broken by their original position. Afterward,
/// operands that share no variable with the operands before them are moved back as long as a
/// later operand does share one, as this would otherwise introduce a cartesian product.
///
/// If the new order changes the output variable order of a join, the join is wrapped in a
/// `Project` that restores it.
#[derive(Debug)]
pub struct JoinOrderRule {
    estimator: Arc<dyn CardinalityEstimator>,
}

impl JoinOrderRule {
    pub fn new(estimator: Arc<dyn CardinalityEstimator>) -> Self {
        Self { estimator }
    }
}

impl OptimizerRule for JoinOrderRule {
    fn name(&self) -> &str {
        "join-order"
    }

    fn priority(&self) -> u32 {
        JOIN_ORDER_PRIORITY
    }

    fn rewrite(&self, op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
        op.transform_up(|node| {
            let Op::Join(join) = node.as_ref() else {
                return Ok(Transformed::no(node));
            };
            let costs = join
                .operands()
                .iter()
                .map(|operand| estimate_cost(operand, self.estimator.as_ref()))
                .collect::<DFResult<Vec<_>>>()?;
            Ok(match reorder_join(&node, join, &costs) {
                Some(reordered) => Transformed::yes(reordered),
                None => Transformed::no(node),
            })
        })
    }
}

/// Like [JoinOrderRule], but prefers operands that bind the variables of pending filters.
///
/// While descending, the variables of each `Filter`, of the right side of a `Minus` (its
/// output variables) and of the right side of an `Exists` or `NotExists` (its output and input
/// variables) are pushed onto a stack. When ordering a join, the topmost set whose variables are
/// all produced by the join is chosen. Every operand that binds none of these variables has its
/// cost increased by `max(1, cost * penalty_ratio)`.
///
/// The right side of a `Minus`, `Exists` or `NotExists` is ordered with an empty stack.
#[derive(Debug)]
pub struct FilterAwareJoinOrderRule {
    estimator: Arc<dyn CardinalityEstimator>,
    penalty_ratio: f64,
}

impl FilterAwareJoinOrderRule {
    pub fn new(estimator: Arc<dyn CardinalityEstimator>, penalty_ratio: f64) -> Self {
        Self {
            estimator,
            penalty_ratio,
        }
    }

    fn optimize(
        &self,
        op: &Arc<Op>,
        filters: &mut Vec<Vec<Variable>>,
    ) -> DFResult<Transformed<Arc<Op>>> {
        match op.as_ref() {
            Op::Filter(node) => {
                filters.push(node.filter_vars().to_vec());
                let inner = self.optimize(node.inner(), filters);
                filters.pop();
                rebuild(op, vec![inner?])
            }
            Op::Minus(node) => {
                let vars = node.filter().output_vars().to_vec();
                self.optimize_semi_join(op, node, vars, filters)
            }
            Op::Exists(node) | Op::NotExists(node) => {
                let mut vars = node.filter().input_vars().to_vec();
                extend_distinct(&mut vars, node.filter().output_vars());
                self.optimize_semi_join(op, node, vars, filters)
            }
            Op::Join(_) => self.optimize_join(op, filters),
            _ => {
                let children = op
                    .children()
                    .into_iter()
                    .map(|child| self.optimize(child, filters))
                    .collect::<DFResult<Vec<_>>>()?;
                rebuild(op, children)
            }
        }
    }

    fn optimize_semi_join(
        &self,
        op: &Arc<Op>,
        node: &SemiJoinNode,
        vars: Vec<Variable>,
        filters: &mut Vec<Vec<Variable>>,
    ) -> DFResult<Transformed<Arc<Op>>> {
        filters.push(vars);
        let main = self.optimize(node.main(), filters);
        filters.pop();
        let filter = self.optimize(node.filter(), &mut Vec::new())?;
        rebuild(op, vec![main?, filter])
    }

    fn optimize_join(
        &self,
        op: &Arc<Op>,
        filters: &mut Vec<Vec<Variable>>,
    ) -> DFResult<Transformed<Arc<Op>>> {
        let children = op
            .children()
            .into_iter()
            .map(|child| self.optimize(child, filters))
            .collect::<DFResult<Vec<_>>>()?;
        let rebuilt = rebuild(op, children)?;
        let Op::Join(join) = rebuilt.data.as_ref() else {
            return Ok(rebuilt);
        };

        let active = filters
            .iter()
            .rev()
            .find(|vars| !vars.is_empty() && contains_all(rebuilt.data.output_vars(), vars));
        let costs = join
            .operands()
            .iter()
            .map(|operand| {
                let cost = estimate_cost(operand, self.estimator.as_ref())?;
                Ok(match active {
                    Some(vars) if !intersects(operand.output_vars(), vars) => {
                        cost.saturating_add(penalty(cost, self.penalty_ratio))
                    }
                    _ => cost,
                })
            })
            .collect::<DFResult<Vec<_>>>()?;

        Ok(match reorder_join(&rebuilt.data, join, &costs) {
            Some(reordered) => Transformed::yes(reordered),
            None => rebuilt,
        })
    }
}

impl OptimizerRule for FilterAwareJoinOrderRule {
    fn name(&self) -> &str {
        "filter-aware-join-order"
    }

    fn priority(&self) -> u32 {
        JOIN_ORDER_PRIORITY
    }

    fn rewrite(&self, op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
        self.optimize(&op, &mut Vec::new())
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Costs are rough estimates"
)]
fn penalty(cost: u64, ratio: f64) -> u64 {
    ((cost as f64 * ratio) as u64).max(1)
}

/// Computes the new operand order of `join` from the operand `costs`.
///
/// Returns [None] if the order does not change.
fn reorder_join(op: &Arc<Op>, join: &NaryNode, costs: &[u64]) -> Option<Arc<Op>> {
    let operands = join.operands();
    let mut order = (0..operands.len()).collect::<Vec<_>>();
    order.sort_by_key(|i| (costs[*i], *i));
    avoid_cartesian_products(operands, &mut order);

    if order.iter().enumerate().all(|(position, i)| position == *i) {
        return None;
    }

    let reordered = Op::join(order.iter().map(|i| Arc::clone(&operands[*i])).collect());
    if reordered.output_vars() == op.output_vars() {
        Some(reordered)
    } else {
        Some(Op::project(reordered, op.output_vars().to_vec()))
    }
}

/// Moves the first later operand that connects to the operands already placed in front of any
/// operand that does not connect.
///
/// An operand connects if its output or input variables overlap the output variables placed so
/// far. If no later operand connects, the cartesian product is unavoidable and the order is kept.
fn avoid_cartesian_products(operands: &[Arc<Op>], order: &mut [usize]) {
    let Some(first) = order.first() else {
        return;
    };
    let mut bound = operands[*first].output_vars().to_vec();

    for position in 1..order.len() {
        let connects = |i: &usize| {
            intersects(operands[*i].output_vars(), &bound)
                || intersects(operands[*i].input_vars(), &bound)
        };
        if !connects(&order[position]) {
            if let Some(offset) = order[position + 1..].iter().position(connects) {
                order[position..=position + 1 + offset].rotate_right(1);
            }
        }
        extend_distinct(&mut bound, operands[order[position]].output_vars());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdtq_algebra::TriplePatternNode;
    use hdtq_estimation::PatternEstimator;
    use hdtq_model::{NamedNode, Term};

    fn var(name: &str) -> Term {
        Variable::new_unchecked(name).into()
    }

    fn iri(value: &str) -> Term {
        NamedNode::new_unchecked(format!("http://ex/{value}")).into()
    }

    #[test]
    fn penalty_is_at_least_one() {
        assert_eq!(penalty(0, 0.5), 1);
        assert_eq!(penalty(1, 0.5), 1);
        assert_eq!(penalty(100, 0.5), 50);
    }

    #[test]
    fn unavoidable_cartesian_product_keeps_order() {
        let operands = vec![
            Op::triple_pattern(var("a"), iri("p"), var("b")),
            Op::triple_pattern(var("c"), iri("p"), var("d")),
        ];
        let mut order = vec![0, 1];
        avoid_cartesian_products(&operands, &mut order);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn connecting_operand_is_moved_forward() {
        let operands = vec![
            Op::triple_pattern(var("x"), iri("p"), var("y")),
            Op::triple_pattern(var("z"), iri("p"), var("w")),
            Op::triple_pattern(var("v"), iri("p"), var("z")),
            Op::triple_pattern(var("x"), iri("p"), var("z")),
        ];
        let mut order = vec![0, 1, 2, 3];
        avoid_cartesian_products(&operands, &mut order);
        assert_eq!(order, vec![0, 3, 1, 2]);
    }

    #[test]
    fn costs_of_composite_operands() -> DFResult<()> {
        let cheap = Op::triple_pattern(iri("s"), var("p"), iri("o"));
        let expensive = Op::triple_pattern(var("s"), iri("p"), var("o"));
        let minus = Op::minus(Arc::clone(&cheap), Arc::clone(&expensive));
        let union = Op::union(vec![cheap, expensive]);

        assert_eq!(estimate_cost(&minus, &PatternEstimator)?, 10);
        assert_eq!(estimate_cost(&union, &PatternEstimator)?, 10_010);
        assert_eq!(estimate_cost(&Op::Identity, &PatternEstimator)?, 0);
        assert_eq!(
            estimate_cost(
                &Op::TriplePattern(TriplePatternNode::new(var("s"), var("p"), var("o"))),
                &PatternEstimator
            )?,
            100_000
        );
        Ok(())
    }
}
