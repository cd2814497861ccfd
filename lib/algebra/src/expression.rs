//! Variable collection and substitution for filter expressions.

use crate::vars::extend_distinct;
use hdtq_model::{Binding, Literal, Term, Variable};
use spargebra::algebra::Expression;

/// Collects the variables referenced by `expression` into `target`, keeping the order of first
/// occurrence.
///
/// Variables that only appear inside an `EXISTS` sub-pattern are not collected.
pub fn collect_expression_variables(expression: &Expression, target: &mut Vec<Variable>) {
    match expression {
        Expression::NamedNode(_) | Expression::Literal(_) | Expression::Exists(_) => {}
        Expression::Variable(variable) | Expression::Bound(variable) => {
            extend_distinct(target, [variable]);
        }
        Expression::Or(lhs, rhs)
        | Expression::And(lhs, rhs)
        | Expression::Equal(lhs, rhs)
        | Expression::SameTerm(lhs, rhs)
        | Expression::Greater(lhs, rhs)
        | Expression::GreaterOrEqual(lhs, rhs)
        | Expression::Less(lhs, rhs)
        | Expression::LessOrEqual(lhs, rhs)
        | Expression::Add(lhs, rhs)
        | Expression::Subtract(lhs, rhs)
        | Expression::Multiply(lhs, rhs)
        | Expression::Divide(lhs, rhs) => {
            collect_expression_variables(lhs, target);
            collect_expression_variables(rhs, target);
        }
        Expression::UnaryPlus(inner) | Expression::UnaryMinus(inner) | Expression::Not(inner) => {
            collect_expression_variables(inner, target);
        }
        Expression::In(lhs, rhs) => {
            collect_expression_variables(lhs, target);
            for item in rhs {
                collect_expression_variables(item, target);
            }
        }
        Expression::If(test, if_true, if_false) => {
            collect_expression_variables(test, target);
            collect_expression_variables(if_true, target);
            collect_expression_variables(if_false, target);
        }
        Expression::Coalesce(args) | Expression::FunctionCall(_, args) => {
            for arg in args {
                collect_expression_variables(arg, target);
            }
        }
    }
}

/// Returns the distinct variables referenced by all `expressions`.
pub fn expression_variables<'a>(expressions: impl IntoIterator<Item = &'a Expression>) -> Vec<Variable> {
    let mut result = Vec::new();
    for expression in expressions {
        collect_expression_variables(expression, &mut result);
    }
    result
}

/// Substitutes the bound variables of `binding` within `expression`.
///
/// `BOUND(?v)` becomes `true` once `?v` is bound. Blank nodes cannot appear as constants in an
/// expression, so variables bound to a blank node remain untouched.
pub fn bind_expression(expression: &Expression, binding: &Binding) -> Expression {
    let bind = |inner: &Expression| Box::new(bind_expression(inner, binding));
    let bind_all = |args: &[Expression]| {
        args.iter()
            .map(|arg| bind_expression(arg, binding))
            .collect::<Vec<_>>()
    };

    match expression {
        Expression::NamedNode(_) | Expression::Literal(_) | Expression::Exists(_) => {
            expression.clone()
        }
        Expression::Variable(variable) => match binding.get(variable) {
            Some(Term::NamedNode(node)) => Expression::NamedNode(node.clone()),
            Some(Term::Literal(literal)) => Expression::Literal(literal.clone()),
            Some(Term::Variable(other)) => Expression::Variable(other.clone()),
            Some(Term::BlankNode(_)) | None => expression.clone(),
        },
        Expression::Bound(variable) => match binding.get(variable) {
            Some(Term::Variable(other)) => Expression::Bound(other.clone()),
            Some(_) => Expression::Literal(Literal::from(true)),
            None => expression.clone(),
        },
        Expression::Or(lhs, rhs) => Expression::Or(bind(lhs), bind(rhs)),
        Expression::And(lhs, rhs) => Expression::And(bind(lhs), bind(rhs)),
        Expression::Equal(lhs, rhs) => Expression::Equal(bind(lhs), bind(rhs)),
        Expression::SameTerm(lhs, rhs) => Expression::SameTerm(bind(lhs), bind(rhs)),
        Expression::Greater(lhs, rhs) => Expression::Greater(bind(lhs), bind(rhs)),
        Expression::GreaterOrEqual(lhs, rhs) => Expression::GreaterOrEqual(bind(lhs), bind(rhs)),
        Expression::Less(lhs, rhs) => Expression::Less(bind(lhs), bind(rhs)),
        Expression::LessOrEqual(lhs, rhs) => Expression::LessOrEqual(bind(lhs), bind(rhs)),
        Expression::Add(lhs, rhs) => Expression::Add(bind(lhs), bind(rhs)),
        Expression::Subtract(lhs, rhs) => Expression::Subtract(bind(lhs), bind(rhs)),
        Expression::Multiply(lhs, rhs) => Expression::Multiply(bind(lhs), bind(rhs)),
        Expression::Divide(lhs, rhs) => Expression::Divide(bind(lhs), bind(rhs)),
        Expression::UnaryPlus(inner) => Expression::UnaryPlus(bind(inner)),
        Expression::UnaryMinus(inner) => Expression::UnaryMinus(bind(inner)),
        Expression::Not(inner) => Expression::Not(bind(inner)),
        Expression::In(lhs, rhs) => Expression::In(bind(lhs), bind_all(rhs)),
        Expression::If(test, if_true, if_false) => {
            Expression::If(bind(test), bind(if_true), bind(if_false))
        }
        Expression::Coalesce(args) => Expression::Coalesce(bind_all(args)),
        Expression::FunctionCall(function, args) => {
            Expression::FunctionCall(function.clone(), bind_all(args))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdtq_model::NamedNode;

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    #[test]
    fn collects_variables_in_order_of_occurrence() {
        let expression = Expression::And(
            Box::new(Expression::Equal(
                Box::new(Expression::Variable(var("b"))),
                Box::new(Expression::Variable(var("a"))),
            )),
            Box::new(Expression::Bound(var("b"))),
        );

        assert_eq!(expression_variables([&expression]), vec![var("b"), var("a")]);
    }

    #[test]
    fn binds_variables_and_bound_checks() {
        let node = NamedNode::new_unchecked("http://example.com/a");
        let binding = Binding::try_new(vec![var("x")], vec![node.clone().into()]).unwrap();
        let expression = Expression::And(
            Box::new(Expression::Equal(
                Box::new(Expression::Variable(var("x"))),
                Box::new(Expression::Variable(var("y"))),
            )),
            Box::new(Expression::Bound(var("x"))),
        );

        let expected = Expression::And(
            Box::new(Expression::Equal(
                Box::new(Expression::NamedNode(node)),
                Box::new(Expression::Variable(var("y"))),
            )),
            Box::new(Expression::Literal(Literal::from(true))),
        );
        assert_eq!(bind_expression(&expression, &binding), expected);
    }

    #[test]
    fn blank_node_bindings_are_not_substituted() {
        let binding =
            Binding::try_new(vec![var("x")], vec![hdtq_model::BlankNode::default().into()])
                .unwrap();
        let expression = Expression::Variable(var("x"));

        assert_eq!(bind_expression(&expression, &binding), expression);
    }
}
