use crate::rule::FILTER_PUSHDOWN_PRIORITY;
use crate::OptimizerRule;
use datafusion::common::tree_node::{Transformed, TreeNode};
use hdtq_algebra::vars::{contains_all, extend_distinct};
use hdtq_algebra::{FilterNode, NaryNode, Op};
use hdtq_common::DFResult;
use hdtq_model::Variable;
use spargebra::algebra::Expression;
use std::sync::Arc;

/// Moves every `Filter` as deep into the tree as possible.
///
/// A filter descends into a node only if that node outputs all variables of the filter. It passes
/// through single-child nodes and into every branch of a `Union`. Within a `Join`, the filter
/// attaches to the first contiguous run of operands that covers its variables, unless only the
/// whole operand list does. Within a `LeftJoin`, it only descends into the required operand.
///
/// A filter is moved, never duplicated into sibling operands of a join. `Limit`, `Offset` and
/// `Slice` are never crossed as this would change which solutions are kept.
#[derive(Debug, Default)]
pub struct FilterPushdownRule;

impl FilterPushdownRule {
    pub fn new() -> Self {
        Self
    }
}

impl OptimizerRule for FilterPushdownRule {
    fn name(&self) -> &str {
        "filter-pushdown"
    }

    fn priority(&self) -> u32 {
        FILTER_PUSHDOWN_PRIORITY
    }

    fn rewrite(&self, op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
        op.transform_up(|node| {
            let Op::Filter(filter) = node.as_ref() else {
                return Ok(Transformed::no(node));
            };
            let pushed = Pushdown::new(filter).push_into(filter.inner())?;
            Ok(match pushed {
                Some(pushed) => Transformed::yes(pushed),
                None => Transformed::no(node),
            })
        })
    }
}

/// The filter that is moved down.
struct Pushdown<'filter> {
    expressions: &'filter [Expression],
    vars: &'filter [Variable],
}

impl<'filter> Pushdown<'filter> {
    fn new(filter: &'filter FilterNode) -> Self {
        Self {
            expressions: filter.expressions(),
            vars: filter.filter_vars(),
        }
    }

    /// Moves the filter into `target` or directly above it.
    fn place(&self, target: &Arc<Op>) -> DFResult<Arc<Op>> {
        match self.push_into(target)? {
            Some(pushed) => Ok(pushed),
            None => Ok(Op::filter(Arc::clone(target), self.expressions.to_vec())),
        }
    }

    /// Moves the filter below `target`.
    ///
    /// Returns [None] if the filter cannot descend below `target`.
    fn push_into(&self, target: &Arc<Op>) -> DFResult<Option<Arc<Op>>> {
        if !self.covered_by(target) {
            return Ok(None);
        }

        let pushed = match target.as_ref() {
            Op::TriplePattern(_)
            | Op::Identity
            | Op::Ask { .. }
            | Op::Limit { .. }
            | Op::Offset { .. }
            | Op::Slice { .. } => None,
            Op::Filter(node) => self.replace_child(target, node.inner())?,
            Op::Assign(node) => self.replace_child(target, node.inner())?,
            Op::Project(node) => self.replace_child(target, node.inner())?,
            Op::Values(node) => self.replace_child(target, node.inner())?,
            Op::Distinct { inner } | Op::WeakDistinct { inner } => {
                self.replace_child(target, inner)?
            }
            Op::Minus(node) | Op::Exists(node) | Op::NotExists(node) => {
                Some(target.with_children(vec![
                    self.place(node.main())?,
                    Arc::clone(node.filter()),
                ])?)
            }
            Op::Union(node) => {
                let branches = node
                    .operands()
                    .iter()
                    .map(|branch| self.place(branch))
                    .collect::<DFResult<Vec<_>>>()?;
                Some(Op::union(branches))
            }
            Op::Join(node) => self.push_into_join(node)?,
            Op::LeftJoin(node) => match node.operands().split_first() {
                Some((required, optional)) if self.covered_by(required) => {
                    let mut operands = vec![self.place(required)?];
                    operands.extend(optional.iter().cloned());
                    Some(Op::left_join(operands))
                }
                _ => None,
            },
        };
        Ok(pushed)
    }

    /// Replaces the only child of `target` with the filtered `child`.
    ///
    /// The filter must stay above `target` if `child` lacks any of its variables (e.g., because
    /// `target` assigns them).
    fn replace_child(&self, target: &Arc<Op>, child: &Arc<Op>) -> DFResult<Option<Arc<Op>>> {
        if !self.covered_by(child) {
            return Ok(None);
        }
        Ok(Some(target.with_children(vec![self.place(child)?])?))
    }

    fn push_into_join(&self, join: &NaryNode) -> DFResult<Option<Arc<Op>>> {
        let operands = join.operands();
        let Some((start, end)) = self.find_covering_run(operands) else {
            return Ok(None);
        };

        let filtered = if end - start == 1 {
            self.place(&operands[start])?
        } else {
            Op::filter(
                Op::join(operands[start..end].to_vec()),
                self.expressions.to_vec(),
            )
        };

        let mut result = operands[..start].to_vec();
        result.push(filtered);
        result.extend(operands[end..].iter().cloned());
        Ok(Some(Op::join(result)))
    }

    /// Finds the first run `start..end` of operands whose output variables cover the filter.
    ///
    /// Runs spanning all operands are skipped.
    fn find_covering_run(&self, operands: &[Arc<Op>]) -> Option<(usize, usize)> {
        (0..operands.len()).find_map(|start| {
            let mut covered = Vec::new();
            for end in start + 1..=operands.len() {
                if start == 0 && end == operands.len() {
                    return None;
                }
                extend_distinct(&mut covered, operands[end - 1].output_vars());
                if contains_all(&covered, self.vars) {
                    return Some((start, end));
                }
            }
            None
        })
    }

    fn covered_by(&self, op: &Op) -> bool {
        contains_all(op.output_vars(), self.vars)
    }
}
