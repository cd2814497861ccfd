use crate::Op;
use datafusion::common::tree_node::DynTreeNode;
use hdtq_common::DFResult;
use std::sync::Arc;

/// Gives `Arc<Op>` the [TreeNode](datafusion::common::tree_node::TreeNode) API.
impl DynTreeNode for Op {
    fn arc_children(&self) -> Vec<&Arc<Self>> {
        self.children()
    }

    fn with_new_arc_children(
        &self,
        arc_self: Arc<Self>,
        new_children: Vec<Arc<Self>>,
    ) -> DFResult<Arc<Self>> {
        arc_self.with_children(new_children)
    }
}
