use crate::vars::{difference, extend_distinct};
use crate::Op;
use hdtq_model::Variable;
use std::sync::Arc;

/// The operands of a `Minus`, `Exists` or `NotExists`.
///
/// Only the solutions of `main` are emitted. The `filter` operand decides which of them are
/// kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SemiJoinNode {
    main: Arc<Op>,
    filter: Arc<Op>,
    /// Variables of `filter` that `main` does not supply, plus the inputs of `main`.
    input: Vec<Variable>,
}

impl SemiJoinNode {
    pub(crate) fn new(main: Arc<Op>, filter: Arc<Op>) -> Self {
        let mut input = difference(
            filter.output_vars().iter().chain(filter.input_vars()),
            main.output_vars(),
        );
        extend_distinct(&mut input, main.input_vars());
        Self {
            main,
            filter,
            input,
        }
    }

    pub fn main(&self) -> &Arc<Op> {
        &self.main
    }

    pub fn filter(&self) -> &Arc<Op> {
        &self.filter
    }

    pub fn input_vars(&self) -> &[Variable] {
        &self.input
    }
}
