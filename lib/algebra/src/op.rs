use crate::{
    AssignNode, FilterNode, NaryNode, ProjectNode, SemiJoinNode, TriplePatternNode, ValuesNode,
};
use datafusion::common::plan_err;
use hdtq_common::DFResult;
use hdtq_model::{Binding, Term, Variable};
use spargebra::algebra::Expression;
use std::sync::Arc;

/// A node of the query algebra tree.
///
/// Nodes are immutable. Rewrites build new nodes and share all unchanged subtrees through
/// [Arc]. Equality is structural over the whole subtree. Composite nodes compute their variable
/// scope once on construction.
///
/// Use the constructor functions (e.g., [Op::join]) to build nodes, as they normalize degenerate
/// shapes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    TriplePattern(TriplePatternNode),
    Join(NaryNode),
    LeftJoin(NaryNode),
    Union(NaryNode),
    Filter(FilterNode),
    Assign(AssignNode),
    Project(ProjectNode),
    Distinct {
        inner: Arc<Op>,
    },
    /// A hint that duplicates may be removed from the solutions of `inner`.
    WeakDistinct {
        inner: Arc<Op>,
    },
    Limit {
        inner: Arc<Op>,
        limit: usize,
    },
    Offset {
        inner: Arc<Op>,
        offset: usize,
    },
    Slice {
        inner: Arc<Op>,
        offset: usize,
        limit: usize,
    },
    Values(ValuesNode),
    Minus(SemiJoinNode),
    Exists(SemiJoinNode),
    NotExists(SemiJoinNode),
    /// Whether `inner` has any solution.
    Ask {
        inner: Arc<Op>,
    },
    /// The neutral element of `Join` and `Union`.
    ///
    /// Produces a single empty solution under a `Join`.
    Identity,
}

impl Op {
    pub fn triple_pattern(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Arc<Op> {
        Arc::new(Op::TriplePattern(TriplePatternNode::new(
            subject, predicate, object,
        )))
    }

    /// Creates a `Join` of the `operands`.
    ///
    /// Zero operands yield [Op::Identity] and a single operand is returned as is.
    pub fn join(operands: Vec<Arc<Op>>) -> Arc<Op> {
        collapse_nary(operands, |operands| Op::Join(NaryNode::new_join(operands)))
    }

    /// Creates a `LeftJoin`. The first operand is the required one.
    ///
    /// Zero operands yield [Op::Identity] and a single operand is returned as is.
    pub fn left_join(operands: Vec<Arc<Op>>) -> Arc<Op> {
        collapse_nary(operands, |operands| {
            Op::LeftJoin(NaryNode::new_join(operands))
        })
    }

    /// Creates a `Union` of the `operands`.
    ///
    /// Zero operands yield [Op::Identity] and a single operand is returned as is.
    pub fn union(operands: Vec<Arc<Op>>) -> Arc<Op> {
        collapse_nary(operands, |operands| Op::Union(NaryNode::new_union(operands)))
    }

    /// Creates a `Filter`. Without any expression, `inner` is returned.
    pub fn filter(inner: Arc<Op>, expressions: Vec<Expression>) -> Arc<Op> {
        if expressions.is_empty() {
            return inner;
        }
        Arc::new(Op::Filter(FilterNode::new(inner, expressions)))
    }

    /// Creates an `Assign`. Without any assignment, `inner` is returned.
    pub fn assign(inner: Arc<Op>, assignments: Vec<(Variable, Expression)>) -> Arc<Op> {
        if assignments.is_empty() {
            return inner;
        }
        Arc::new(Op::Assign(AssignNode::new(inner, assignments)))
    }

    pub fn project(inner: Arc<Op>, variables: Vec<Variable>) -> Arc<Op> {
        Arc::new(Op::Project(ProjectNode::new(inner, variables)))
    }

    pub fn distinct(inner: Arc<Op>) -> Arc<Op> {
        Arc::new(Op::Distinct { inner })
    }

    pub fn weak_distinct(inner: Arc<Op>) -> Arc<Op> {
        Arc::new(Op::WeakDistinct { inner })
    }

    pub fn limit(inner: Arc<Op>, limit: usize) -> Arc<Op> {
        Arc::new(Op::Limit { inner, limit })
    }

    pub fn offset(inner: Arc<Op>, offset: usize) -> Arc<Op> {
        Arc::new(Op::Offset { inner, offset })
    }

    pub fn slice(inner: Arc<Op>, offset: usize, limit: usize) -> Arc<Op> {
        Arc::new(Op::Slice {
            inner,
            offset,
            limit,
        })
    }

    pub fn values(inner: Arc<Op>, variables: Vec<Variable>, rows: Vec<Binding>) -> Arc<Op> {
        Arc::new(Op::Values(ValuesNode::new(inner, variables, rows)))
    }

    pub fn minus(main: Arc<Op>, filter: Arc<Op>) -> Arc<Op> {
        Arc::new(Op::Minus(SemiJoinNode::new(main, filter)))
    }

    pub fn exists(main: Arc<Op>, filter: Arc<Op>) -> Arc<Op> {
        Arc::new(Op::Exists(SemiJoinNode::new(main, filter)))
    }

    pub fn not_exists(main: Arc<Op>, filter: Arc<Op>) -> Arc<Op> {
        Arc::new(Op::NotExists(SemiJoinNode::new(main, filter)))
    }

    pub fn ask(inner: Arc<Op>) -> Arc<Op> {
        Arc::new(Op::Ask { inner })
    }

    pub fn identity() -> Arc<Op> {
        Arc::new(Op::Identity)
    }

    /// The name of the node kind, as used in plans and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Op::TriplePattern(_) => "TriplePattern",
            Op::Join(_) => "Join",
            Op::LeftJoin(_) => "LeftJoin",
            Op::Union(_) => "Union",
            Op::Filter(_) => "Filter",
            Op::Assign(_) => "Assign",
            Op::Project(_) => "Project",
            Op::Distinct { .. } => "Distinct",
            Op::WeakDistinct { .. } => "WeakDistinct",
            Op::Limit { .. } => "Limit",
            Op::Offset { .. } => "Offset",
            Op::Slice { .. } => "Slice",
            Op::Values(_) => "Values",
            Op::Minus(_) => "Minus",
            Op::Exists(_) => "Exists",
            Op::NotExists(_) => "NotExists",
            Op::Ask { .. } => "Ask",
            Op::Identity => "Identity",
        }
    }

    /// The direct operands of this node.
    ///
    /// For `Minus`, `Exists` and `NotExists` the main operand comes first.
    pub fn children(&self) -> Vec<&Arc<Op>> {
        match self {
            Op::TriplePattern(_) | Op::Identity => Vec::new(),
            Op::Join(node) | Op::LeftJoin(node) | Op::Union(node) => {
                node.operands().iter().collect()
            }
            Op::Filter(node) => vec![node.inner()],
            Op::Assign(node) => vec![node.inner()],
            Op::Project(node) => vec![node.inner()],
            Op::Values(node) => vec![node.inner()],
            Op::Distinct { inner }
            | Op::WeakDistinct { inner }
            | Op::Limit { inner, .. }
            | Op::Offset { inner, .. }
            | Op::Slice { inner, .. }
            | Op::Ask { inner } => vec![inner],
            Op::Minus(node) | Op::Exists(node) | Op::NotExists(node) => {
                vec![node.main(), node.filter()]
            }
        }
    }

    /// The variables that are exposed in the solutions of this node, in column order.
    pub fn output_vars(&self) -> &[Variable] {
        match self {
            Op::TriplePattern(node) => node.vars_info().names(),
            Op::Join(node) | Op::LeftJoin(node) | Op::Union(node) => node.vars().output(),
            Op::Filter(node) => node.inner().output_vars(),
            Op::Assign(node) => node.vars().output(),
            Op::Project(node) => node.variables(),
            Op::Values(node) => node.vars().output(),
            Op::Distinct { inner }
            | Op::WeakDistinct { inner }
            | Op::Limit { inner, .. }
            | Op::Offset { inner, .. }
            | Op::Slice { inner, .. } => inner.output_vars(),
            Op::Minus(node) | Op::Exists(node) | Op::NotExists(node) => node.main().output_vars(),
            Op::Ask { .. } | Op::Identity => &[],
        }
    }

    /// The variables that are referenced within this subtree but never bound by evaluating it.
    ///
    /// These variables must be supplied from the outside (e.g., by an enclosing join).
    pub fn input_vars(&self) -> &[Variable] {
        match self {
            Op::TriplePattern(_) | Op::Identity => &[],
            Op::Join(node) | Op::LeftJoin(node) | Op::Union(node) => node.vars().input(),
            Op::Filter(node) => node.input_vars(),
            Op::Assign(node) => node.vars().input(),
            Op::Project(node) => node.inner().input_vars(),
            Op::Values(node) => node.vars().input(),
            Op::Distinct { inner }
            | Op::WeakDistinct { inner }
            | Op::Limit { inner, .. }
            | Op::Offset { inner, .. }
            | Op::Slice { inner, .. }
            | Op::Ask { inner } => inner.input_vars(),
            Op::Minus(node) | Op::Exists(node) | Op::NotExists(node) => node.input_vars(),
        }
    }

    /// Rebuilds this node over a new list of children.
    ///
    /// Fails if the number of `children` does not fit the node kind. `Join`, `LeftJoin` and
    /// `Union` accept any number of children and collapse like their constructors.
    pub fn with_children(self: &Arc<Self>, children: Vec<Arc<Op>>) -> DFResult<Arc<Op>> {
        match self.as_ref() {
            Op::TriplePattern(_) | Op::Identity => {
                if !children.is_empty() {
                    return plan_err!(
                        "{} is a leaf and cannot have children, got {}",
                        self.name(),
                        children.len()
                    );
                }
                Ok(Arc::clone(self))
            }
            Op::Join(_) => Ok(Op::join(children)),
            Op::LeftJoin(_) => Ok(Op::left_join(children)),
            Op::Union(_) => Ok(Op::union(children)),
            Op::Filter(node) => {
                let inner = self.exactly_one_child(children)?;
                Ok(Arc::new(Op::Filter(FilterNode::new(
                    inner,
                    node.expressions().to_vec(),
                ))))
            }
            Op::Assign(node) => {
                let inner = self.exactly_one_child(children)?;
                Ok(Arc::new(Op::Assign(AssignNode::new(
                    inner,
                    node.assignments().to_vec(),
                ))))
            }
            Op::Project(node) => {
                let inner = self.exactly_one_child(children)?;
                Ok(Op::project(inner, node.variables().to_vec()))
            }
            Op::Values(node) => {
                let inner = self.exactly_one_child(children)?;
                Ok(Op::values(
                    inner,
                    node.variables().to_vec(),
                    node.rows().to_vec(),
                ))
            }
            Op::Distinct { .. } => Ok(Op::distinct(self.exactly_one_child(children)?)),
            Op::WeakDistinct { .. } => Ok(Op::weak_distinct(self.exactly_one_child(children)?)),
            Op::Limit { limit, .. } => Ok(Op::limit(self.exactly_one_child(children)?, *limit)),
            Op::Offset { offset, .. } => {
                Ok(Op::offset(self.exactly_one_child(children)?, *offset))
            }
            Op::Slice { offset, limit, .. } => Ok(Op::slice(
                self.exactly_one_child(children)?,
                *offset,
                *limit,
            )),
            Op::Ask { .. } => Ok(Op::ask(self.exactly_one_child(children)?)),
            Op::Minus(_) => {
                let (main, filter) = self.exactly_two_children(children)?;
                Ok(Op::minus(main, filter))
            }
            Op::Exists(_) => {
                let (main, filter) = self.exactly_two_children(children)?;
                Ok(Op::exists(main, filter))
            }
            Op::NotExists(_) => {
                let (main, filter) = self.exactly_two_children(children)?;
                Ok(Op::not_exists(main, filter))
            }
        }
    }

    fn exactly_one_child(&self, children: Vec<Arc<Op>>) -> DFResult<Arc<Op>> {
        let len = children.len();
        let Ok([inner]) = TryInto::<[Arc<Op>; 1]>::try_into(children) else {
            return plan_err!("{} must have exactly one input, actual: {len}", self.name());
        };
        Ok(inner)
    }

    fn exactly_two_children(&self, children: Vec<Arc<Op>>) -> DFResult<(Arc<Op>, Arc<Op>)> {
        let len = children.len();
        let Ok([main, filter]) = TryInto::<[Arc<Op>; 2]>::try_into(children) else {
            return plan_err!("{} must have exactly two inputs, actual: {len}", self.name());
        };
        Ok((main, filter))
    }
}

fn collapse_nary(
    mut operands: Vec<Arc<Op>>,
    create: impl FnOnce(Vec<Arc<Op>>) -> Op,
) -> Arc<Op> {
    match operands.len() {
        0 => Op::identity(),
        1 => operands.swap_remove(0),
        _ => Arc::new(create(operands)),
    }
}
