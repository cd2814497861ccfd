use crate::OptimizerRule;
use datafusion::common::tree_node::{Transformed, TreeNodeRecursion};
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use std::sync::Arc;
use tracing::debug;

/// Applies a list of [OptimizerRule]s to a tree.
///
/// Each rule runs exactly once, in ascending priority order. Rules with the same priority keep
/// their relative order.
#[derive(Clone, Debug, Default)]
pub struct Optimizer {
    rules: Vec<Arc<dyn OptimizerRule>>,
}

impl Optimizer {
    pub fn new(mut rules: Vec<Arc<dyn OptimizerRule>>) -> Self {
        rules.sort_by_key(|rule| rule.priority());
        Self { rules }
    }

    /// The rules in the order they are applied.
    pub fn rules(&self) -> &[Arc<dyn OptimizerRule>] {
        &self.rules
    }

    pub fn optimize(&self, op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
        let mut transformed = false;
        let mut current = op;
        for rule in &self.rules {
            let result = rule
                .rewrite(Arc::clone(&current))
                .map_err(|error| error.context(format!("Optimizer rule '{}' failed", rule.name())))?;
            if result.transformed {
                debug!(
                    rule = rule.name(),
                    priority = rule.priority(),
                    "Optimizer rule rewrote the plan"
                );
            }
            transformed |= result.transformed;
            current = result.data;
        }
        Ok(Transformed::new(
            current,
            transformed,
            TreeNodeRecursion::Continue,
        ))
    }
}
