use crate::rule::{rebuild, DISTINCT_PUSHDOWN_PRIORITY};
use crate::OptimizerRule;
use datafusion::common::tree_node::Transformed;
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use std::sync::Arc;

/// Marks intermediate results whose duplicates may be dropped with `WeakDistinct`.
///
/// Duplicates are irrelevant below an `Ask`, a `Distinct` and in the right-hand operand of a
/// `Minus`, `Exists` or `NotExists`. Within such a context, every operand of a `Join`, `LeftJoin`
/// and `Filter` is wrapped in a `WeakDistinct` hint. A `Limit`, `Offset` or `Slice` ends the
/// context.
///
/// The right-hand operand of the semi-joins only decides whether a solution of the left-hand
/// operand is kept, so its multiplicities never reach the result. The left-hand operand keeps the
/// surrounding context.
///
/// The hints neither change the solutions nor the variables of the tree.
#[derive(Debug, Default)]
pub struct DistinctPushdownRule;

impl DistinctPushdownRule {
    pub fn new() -> Self {
        Self
    }
}

impl OptimizerRule for DistinctPushdownRule {
    fn name(&self) -> &str {
        "distinct-pushdown"
    }

    fn priority(&self) -> u32 {
        DISTINCT_PUSHDOWN_PRIORITY
    }

    fn rewrite(&self, op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
        visit(&op, false)
    }
}

fn visit(op: &Arc<Op>, distinct_context: bool) -> DFResult<Transformed<Arc<Op>>> {
    match op.as_ref() {
        Op::Ask { inner } | Op::Distinct { inner } => rebuild(op, vec![visit(inner, true)?]),
        Op::Limit { inner, .. } | Op::Offset { inner, .. } | Op::Slice { inner, .. } => {
            rebuild(op, vec![visit(inner, false)?])
        }
        Op::Minus(node) | Op::Exists(node) | Op::NotExists(node) => rebuild(
            op,
            vec![
                visit(node.main(), distinct_context)?,
                visit(node.filter(), true)?,
            ],
        ),
        Op::Join(_) | Op::LeftJoin(_) | Op::Filter(_) if distinct_context => {
            let children = op
                .children()
                .into_iter()
                .map(|child| Ok(mark(visit(child, true)?)))
                .collect::<DFResult<Vec<_>>>()?;
            rebuild(op, children)
        }
        _ => {
            let children = op
                .children()
                .into_iter()
                .map(|child| visit(child, distinct_context))
                .collect::<DFResult<Vec<_>>>()?;
            rebuild(op, children)
        }
    }
}

fn mark(child: Transformed<Arc<Op>>) -> Transformed<Arc<Op>> {
    if matches!(
        child.data.as_ref(),
        Op::Distinct { .. } | Op::WeakDistinct { .. }
    ) {
        return child;
    }
    Transformed::yes(Op::weak_distinct(child.data))
}
