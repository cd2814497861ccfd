use crate::rule::{rebuild, PROJECTION_PUSHDOWN_PRIORITY};
use crate::OptimizerRule;
use datafusion::common::tree_node::{Transformed, TreeNode, TreeNodeRecursion};
use hdtq_algebra::vars::extend_distinct;
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use hdtq_model::Variable;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// Drops variables from intermediate results as soon as no ancestor needs them anymore.
///
/// Starting at each `Project` or `Ask`, the rule tracks the variables that are still useful. A
/// variable is useful if it is projected, referenced by a pending filter, assignment or values
/// clause, or is shared with a sibling operand of a join. Every node below whose output contains a
/// variable that is no longer useful is wrapped in a `Project` keeping only the useful ones.
///
/// Triple patterns are never wrapped. Below a `Distinct`, all variables remain useful.
#[derive(Debug, Default)]
pub struct ProjectionPushdownRule;

impl ProjectionPushdownRule {
    pub fn new() -> Self {
        Self
    }
}

impl OptimizerRule for ProjectionPushdownRule {
    fn name(&self) -> &str {
        "projection-pushdown"
    }

    fn priority(&self) -> u32 {
        PROJECTION_PUSHDOWN_PRIORITY
    }

    fn rewrite(&self, op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
        op.transform_down(|node| {
            let pruned = match node.as_ref() {
                Op::Project(project) => {
                    let mut useful = UsefulVars::from_vars(project.variables());
                    let inner = prune(project.inner(), &mut useful)?;
                    rebuild(&node, vec![inner])?
                }
                Op::Ask { inner } => {
                    let inner = prune(inner, &mut UsefulVars::default())?;
                    rebuild(&node, vec![inner])?
                }
                _ => return Ok(Transformed::no(node)),
            };
            // Nested projections have already been handled by `prune`.
            Ok(Transformed::new(
                pruned.data,
                pruned.transformed,
                TreeNodeRecursion::Jump,
            ))
        })
    }
}

/// A multiset of variables.
///
/// A variable stays useful until every addition has been matched by a removal.
#[derive(Debug, Default)]
struct UsefulVars {
    counts: FxHashMap<Variable, usize>,
}

impl UsefulVars {
    fn from_vars(vars: &[Variable]) -> Self {
        let mut result = Self::default();
        result.add(vars);
        result
    }

    fn add(&mut self, vars: &[Variable]) {
        for var in vars {
            *self.counts.entry(var.clone()).or_insert(0) += 1;
        }
    }

    fn remove(&mut self, vars: &[Variable]) {
        for var in vars {
            if let Entry::Occupied(mut entry) = self.counts.entry(var.clone()) {
                *entry.get_mut() -= 1;
                if *entry.get() == 0 {
                    entry.remove();
                }
            }
        }
    }

    fn contains(&self, var: &Variable) -> bool {
        self.counts.contains_key(var)
    }

    /// The useful variables of `vars`, in the order of `vars`.
    fn retain(&self, vars: &[Variable]) -> Vec<Variable> {
        vars.iter().filter(|v| self.contains(v)).cloned().collect()
    }
}

/// Prunes the descendants of `op`. `op` itself is not wrapped.
fn prune(op: &Arc<Op>, useful: &mut UsefulVars) -> DFResult<Transformed<Arc<Op>>> {
    match op.as_ref() {
        Op::TriplePattern(_) | Op::Identity => Ok(Transformed::no(Arc::clone(op))),
        Op::Join(_) | Op::LeftJoin(_) | Op::Minus(_) | Op::Exists(_) | Op::NotExists(_) => {
            prune_siblings(op, useful)
        }
        Op::Union(node) => {
            let branches = node
                .operands()
                .iter()
                .map(|branch| prune_and_wrap(branch, useful))
                .collect::<DFResult<Vec<_>>>()?;
            rebuild(op, branches)
        }
        Op::Filter(node) => with_useful(node.filter_vars(), useful, |useful| {
            let inner = prune_and_wrap(node.inner(), useful)?;
            rebuild(op, vec![inner])
        }),
        Op::Assign(node) => with_useful(&node.referenced_vars(), useful, |useful| {
            let inner = prune_and_wrap(node.inner(), useful)?;
            rebuild(op, vec![inner])
        }),
        Op::Values(node) => with_useful(node.variables(), useful, |useful| {
            let inner = prune_and_wrap(node.inner(), useful)?;
            rebuild(op, vec![inner])
        }),
        Op::Distinct { inner } | Op::WeakDistinct { inner } => {
            let mut useful = UsefulVars::from_vars(inner.output_vars());
            let inner = prune(inner, &mut useful)?;
            rebuild(op, vec![inner])
        }
        Op::Limit { inner, .. } | Op::Offset { inner, .. } | Op::Slice { inner, .. } => {
            let inner = prune_and_wrap(inner, useful)?;
            rebuild(op, vec![inner])
        }
        Op::Project(node) => {
            let variables = useful.retain(node.variables());
            let mut useful = UsefulVars::from_vars(&variables);
            let inner = prune(node.inner(), &mut useful)?;
            if !inner.transformed && variables.len() == node.variables().len() {
                return Ok(Transformed::no(Arc::clone(op)));
            }
            Ok(Transformed::yes(Op::project(inner.data, variables)))
        }
        Op::Ask { inner } => {
            let inner = prune(inner, &mut UsefulVars::default())?;
            rebuild(op, vec![inner])
        }
    }
}

/// Prunes the operands of a node that joins them on their shared variables.
///
/// While an operand is pruned, the variables of all other operands are useful.
fn prune_siblings(op: &Arc<Op>, useful: &mut UsefulVars) -> DFResult<Transformed<Arc<Op>>> {
    let children = op.children();
    let contributions = children
        .iter()
        .map(|child| {
            let mut vars = child.output_vars().to_vec();
            extend_distinct(&mut vars, child.input_vars());
            vars
        })
        .collect::<Vec<_>>();
    for vars in &contributions {
        useful.add(vars);
    }

    let pruned = children
        .iter()
        .zip(&contributions)
        .map(|(child, vars)| {
            useful.remove(vars);
            let pruned = prune_and_wrap(child, useful);
            useful.add(vars);
            pruned
        })
        .collect::<DFResult<Vec<_>>>();

    for vars in &contributions {
        useful.remove(vars);
    }
    rebuild(op, pruned?)
}

fn prune_and_wrap(op: &Arc<Op>, useful: &mut UsefulVars) -> DFResult<Transformed<Arc<Op>>> {
    let pruned = prune(op, useful)?;
    if matches!(pruned.data.as_ref(), Op::TriplePattern(_) | Op::Project(_)) {
        return Ok(pruned);
    }

    let variables = useful.retain(pruned.data.output_vars());
    if variables.len() == pruned.data.output_vars().len() {
        return Ok(pruned);
    }
    Ok(Transformed::yes(Op::project(pruned.data, variables)))
}

fn with_useful<T>(
    vars: &[Variable],
    useful: &mut UsefulVars,
    f: impl FnOnce(&mut UsefulVars) -> T,
) -> T {
    useful.add(vars);
    let result = f(useful);
    useful.remove(vars);
    result
}
