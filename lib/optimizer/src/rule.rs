use datafusion::common::tree_node::Transformed;
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use std::fmt::Debug;
use std::sync::Arc;

pub const JOIN_ORDER_PRIORITY: u32 = 100;
pub const FILTER_PUSHDOWN_PRIORITY: u32 = 200;
pub const PROJECTION_PUSHDOWN_PRIORITY: u32 = 300;
pub const DISTINCT_PUSHDOWN_PRIORITY: u32 = 400;

/// A rewrite of an algebra tree that preserves its semantics.
///
/// A rule must report [Transformed::no] with the original tree if it did not change anything.
pub trait OptimizerRule: Debug + Send + Sync {
    /// A unique name used in logs and error messages.
    fn name(&self) -> &str;

    /// Rules with a lower priority run first.
    fn priority(&self) -> u32;

    /// Rewrites the tree rooted at `op`.
    fn rewrite(&self, op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>>;
}

/// Rebuilds `op` over the given children if any of them changed.
pub(crate) fn rebuild(
    op: &Arc<Op>,
    children: Vec<Transformed<Arc<Op>>>,
) -> DFResult<Transformed<Arc<Op>>> {
    if !children.iter().any(|child| child.transformed) {
        return Ok(Transformed::no(Arc::clone(op)));
    }
    let children = children.into_iter().map(|child| child.data).collect();
    Ok(Transformed::yes(op.with_children(children)?))
}
