use crate::Op;
use hdtq_model::Variable;
use std::sync::Arc;

/// Restricts the solutions of `inner` to an explicit, ordered list of variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectNode {
    inner: Arc<Op>,
    variables: Vec<Variable>,
}

impl ProjectNode {
    pub(crate) fn new(inner: Arc<Op>, variables: Vec<Variable>) -> Self {
        let mut distinct = Vec::with_capacity(variables.len());
        crate::vars::extend_distinct(&mut distinct, &variables);
        Self {
            inner,
            variables: distinct,
        }
    }

    pub fn inner(&self) -> &Arc<Op> {
        &self.inner
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}
