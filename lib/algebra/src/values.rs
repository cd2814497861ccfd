use crate::vars::{difference, extend_distinct, OpVars};
use crate::Op;
use hdtq_model::{Binding, Variable};
use std::sync::Arc;

/// Joins the solutions of `inner` with an inline table.
///
/// Each row is a [Binding] over a subset of [Self::variables]. Missing variables are unbound.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValuesNode {
    inner: Arc<Op>,
    variables: Vec<Variable>,
    rows: Vec<Binding>,
    vars: OpVars,
}

impl ValuesNode {
    pub(crate) fn new(inner: Arc<Op>, variables: Vec<Variable>, rows: Vec<Binding>) -> Self {
        let mut output = Vec::new();
        extend_distinct(&mut output, &variables);
        let variables = output.clone();
        extend_distinct(&mut output, inner.output_vars());
        let input = difference(inner.input_vars(), &variables);
        Self {
            inner,
            variables,
            rows,
            vars: OpVars::new(output, input),
        }
    }

    pub fn inner(&self) -> &Arc<Op> {
        &self.inner
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn rows(&self) -> &[Binding] {
        &self.rows
    }

    pub fn vars(&self) -> &OpVars {
        &self.vars
    }
}
