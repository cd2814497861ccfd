use crate::expression::bind_expression;
use crate::Op;
use datafusion::common::tree_node::Transformed;
use hdtq_model::{Binding, BindingError, Term, Variable};
use std::sync::Arc;

impl Op {
    /// Substitutes the variables of `binding` wherever they are free in this subtree.
    ///
    /// Subtrees whose output and input variables are disjoint from the binding are not visited
    /// and are shared with the result. Variables that are projected away or assigned by a node
    /// are local to that node and are not substituted below it.
    pub fn bind(self: &Arc<Self>, binding: &Binding) -> Transformed<Arc<Op>> {
        if binding.is_empty()
            || !(binding.intersects(self.output_vars()) || binding.intersects(self.input_vars()))
        {
            return Transformed::no(Arc::clone(self));
        }

        let bound = match self.as_ref() {
            Op::TriplePattern(node) => Arc::new(Op::TriplePattern(node.bind(binding))),
            Op::Join(node) => Op::join(bind_all(node.operands(), binding)),
            Op::LeftJoin(node) => Op::left_join(bind_all(node.operands(), binding)),
            Op::Union(node) => Op::union(bind_all(node.operands(), binding)),
            Op::Filter(node) => Op::filter(
                node.inner().bind(binding).data,
                node.expressions()
                    .iter()
                    .map(|expression| bind_expression(expression, binding))
                    .collect(),
            ),
            Op::Assign(node) => {
                let assigned = node.assigned_vars().collect::<Vec<_>>();
                let visible = binding.filter(|variable| !assigned.contains(&variable));
                Op::assign(
                    node.inner().bind(&visible).data,
                    node.assignments()
                        .iter()
                        .map(|(variable, expression)| {
                            (variable.clone(), bind_expression(expression, &visible))
                        })
                        .collect(),
                )
            }
            Op::Project(node) => {
                let visible = binding.filter(|variable| {
                    node.variables().contains(variable)
                        || node.inner().input_vars().contains(variable)
                });
                let remaining = node
                    .variables()
                    .iter()
                    .filter(|variable| !visible.contains(variable))
                    .cloned()
                    .collect();
                Op::project(node.inner().bind(&visible).data, remaining)
            }
            Op::Values(node) => {
                let rows = node
                    .rows()
                    .iter()
                    .filter(|row| is_compatible(row, binding))
                    .map(|row| row.filter(|variable| !binding.contains(variable)))
                    .collect();
                let variables = node
                    .variables()
                    .iter()
                    .filter(|variable| !binding.contains(variable))
                    .cloned()
                    .collect();
                Op::values(node.inner().bind(binding).data, variables, rows)
            }
            Op::Distinct { inner } => Op::distinct(inner.bind(binding).data),
            Op::WeakDistinct { inner } => Op::weak_distinct(inner.bind(binding).data),
            Op::Limit { inner, limit } => Op::limit(inner.bind(binding).data, *limit),
            Op::Offset { inner, offset } => Op::offset(inner.bind(binding).data, *offset),
            Op::Slice {
                inner,
                offset,
                limit,
            } => Op::slice(inner.bind(binding).data, *offset, *limit),
            Op::Ask { inner } => Op::ask(inner.bind(binding).data),
            Op::Minus(node) => Op::minus(
                node.main().bind(binding).data,
                node.filter().bind(binding).data,
            ),
            Op::Exists(node) => Op::exists(
                node.main().bind(binding).data,
                node.filter().bind(binding).data,
            ),
            Op::NotExists(node) => Op::not_exists(
                node.main().bind(binding).data,
                node.filter().bind(binding).data,
            ),
            Op::Identity => return Transformed::no(Arc::clone(self)),
        };
        Transformed::yes(bound)
    }

    /// Substitutes `variables[i]` with `terms[i]`. See [Op::bind].
    pub fn bind_values(
        self: &Arc<Self>,
        variables: Vec<Variable>,
        terms: Vec<Term>,
    ) -> Result<Transformed<Arc<Op>>, BindingError> {
        let binding = Binding::try_new(variables, terms)?;
        Ok(self.bind(&binding))
    }
}

fn bind_all(operands: &[Arc<Op>], binding: &Binding) -> Vec<Arc<Op>> {
    operands
        .iter()
        .map(|operand| operand.bind(binding).data)
        .collect()
}

/// A values row is compatible if it agrees with `binding` on all variables it binds.
fn is_compatible(row: &Binding, binding: &Binding) -> bool {
    binding
        .iter()
        .all(|(variable, term)| row.get(variable).is_none_or(|value| value == term))
}
