use crate::expression::{collect_expression_variables, expression_variables};
use crate::vars::{difference, extend_distinct, OpVars};
use crate::Op;
use hdtq_model::Variable;
use spargebra::algebra::Expression;
use std::sync::Arc;

/// Keeps the solutions of `inner` for which all `expressions` evaluate to true.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterNode {
    inner: Arc<Op>,
    expressions: Vec<Expression>,
    /// All variables referenced by the expressions.
    filter_vars: Vec<Variable>,
    input: Vec<Variable>,
}

impl FilterNode {
    pub(crate) fn new(inner: Arc<Op>, expressions: Vec<Expression>) -> Self {
        let filter_vars = expression_variables(&expressions);
        let mut input = difference(&filter_vars, inner.output_vars());
        extend_distinct(&mut input, inner.input_vars());
        Self {
            inner,
            expressions,
            filter_vars,
            input,
        }
    }

    pub fn inner(&self) -> &Arc<Op> {
        &self.inner
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// The variables referenced by [Self::expressions].
    pub fn filter_vars(&self) -> &[Variable] {
        &self.filter_vars
    }

    pub fn input_vars(&self) -> &[Variable] {
        &self.input
    }
}

/// Extends the solutions of `inner` with computed variables.
///
/// Assignments are evaluated in order. Later expressions may refer to earlier assignments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssignNode {
    inner: Arc<Op>,
    assignments: Vec<(Variable, Expression)>,
    vars: OpVars,
}

impl AssignNode {
    pub(crate) fn new(inner: Arc<Op>, assignments: Vec<(Variable, Expression)>) -> Self {
        let mut output = inner.output_vars().to_vec();
        let mut input = Vec::new();
        for (variable, expression) in &assignments {
            let mut referenced = Vec::new();
            collect_expression_variables(expression, &mut referenced);
            extend_distinct(&mut input, referenced.iter().filter(|v| !output.contains(v)));
            extend_distinct(&mut output, [variable]);
        }
        extend_distinct(&mut input, inner.input_vars());
        Self {
            inner,
            assignments,
            vars: OpVars::new(output, input),
        }
    }

    pub fn inner(&self) -> &Arc<Op> {
        &self.inner
    }

    pub fn assignments(&self) -> &[(Variable, Expression)] {
        &self.assignments
    }

    /// The variables bound by this node.
    pub fn assigned_vars(&self) -> impl Iterator<Item = &Variable> {
        self.assignments.iter().map(|(variable, _)| variable)
    }

    /// The variables referenced by any of the assigned expressions.
    pub fn referenced_vars(&self) -> Vec<Variable> {
        expression_variables(self.assignments.iter().map(|(_, expression)| expression))
    }

    pub fn vars(&self) -> &OpVars {
        &self.vars
    }
}
