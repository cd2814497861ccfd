use hdtq_algebra::Op;
use hdtq_model::{Literal, NamedNode, Term, Variable};
use spargebra::algebra::Expression;
use std::sync::Arc;

pub fn variable(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

pub fn var(name: &str) -> Term {
    variable(name).into()
}

pub fn iri(value: &str) -> Term {
    NamedNode::new_unchecked(format!("http://ex/{value}")).into()
}

pub fn tp(subject: Term, predicate: Term, object: Term) -> Arc<Op> {
    Op::triple_pattern(subject, predicate, object)
}

/// `?name > value`
pub fn greater(name: &str, value: i32) -> Expression {
    Expression::Greater(
        Box::new(Expression::Variable(variable(name))),
        Box::new(Expression::Literal(Literal::from(value))),
    )
}

/// `sameTerm(?lhs, ?rhs)`
pub fn same_term(lhs: &str, rhs: &str) -> Expression {
    Expression::SameTerm(
        Box::new(Expression::Variable(variable(lhs))),
        Box::new(Expression::Variable(variable(rhs))),
    )
}
