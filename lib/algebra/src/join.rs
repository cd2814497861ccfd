use crate::vars::{difference, extend_distinct, OpVars};
use crate::Op;
use hdtq_model::Variable;
use std::sync::Arc;

/// The operands of an n-ary operator (`Join`, `LeftJoin` or `Union`).
///
/// The first operand of a `LeftJoin` is the required side, all others are optional.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NaryNode {
    operands: Vec<Arc<Op>>,
    vars: OpVars,
}

impl NaryNode {
    /// Creates the node of a `Join` or `LeftJoin`.
    ///
    /// Inputs that are supplied by a sibling operand are resolved by the join itself.
    pub(crate) fn new_join(operands: Vec<Arc<Op>>) -> Self {
        let output = collect_output(&operands);
        let input = difference(operands.iter().flat_map(|op| op.input_vars()), &output);
        Self {
            operands,
            vars: OpVars::new(output, input),
        }
    }

    /// Creates the node of a `Union`.
    ///
    /// Branches are evaluated independently, so no branch resolves the inputs of another.
    pub(crate) fn new_union(operands: Vec<Arc<Op>>) -> Self {
        let output = collect_output(&operands);
        let mut input = Vec::new();
        for operand in &operands {
            extend_distinct(&mut input, operand.input_vars());
        }
        Self {
            operands,
            vars: OpVars::new(output, input),
        }
    }

    pub fn operands(&self) -> &[Arc<Op>] {
        &self.operands
    }

    pub fn vars(&self) -> &OpVars {
        &self.vars
    }
}

fn collect_output(operands: &[Arc<Op>]) -> Vec<Variable> {
    let mut output = Vec::new();
    for operand in operands {
        extend_distinct(&mut output, operand.output_vars());
    }
    output
}
