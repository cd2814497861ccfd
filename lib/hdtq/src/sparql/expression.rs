use spargebra::algebra::Expression;

/// Splits `expression` into its top-level conjuncts.
pub(super) fn split_conjunction(expression: &Expression, conjuncts: &mut Vec<Expression>) {
    match expression {
        Expression::And(lhs, rhs) => {
            split_conjunction(lhs, conjuncts);
            split_conjunction(rhs, conjuncts);
        }
        _ => conjuncts.push(expression.clone()),
    }
}

/// Returns whether an `EXISTS` appears anywhere within `expression`.
pub(super) fn contains_exists(expression: &Expression) -> bool {
    match expression {
        Expression::NamedNode(_)
        | Expression::Literal(_)
        | Expression::Variable(_)
        | Expression::Bound(_) => false,
        Expression::Exists(_) => true,
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
        | Expression::Divide(lhs, rhs) => contains_exists(lhs) || contains_exists(rhs),
        Expression::In(inner, list) => contains_exists(inner) || list.iter().any(contains_exists),
        Expression::UnaryPlus(inner) | Expression::UnaryMinus(inner) | Expression::Not(inner) => {
            contains_exists(inner)
        }
        Expression::If(condition, then, otherwise) => {
            contains_exists(condition) || contains_exists(then) || contains_exists(otherwise)
        }
        Expression::Coalesce(list) | Expression::FunctionCall(_, list) => {
            list.iter().any(contains_exists)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdtq_model::Variable;
    use spargebra::algebra::GraphPattern;

    fn var(name: &str) -> Expression {
        Expression::Variable(Variable::new_unchecked(name))
    }

    #[test]
    fn test_split_nested_conjunction() {
        let expression = Expression::And(
            Box::new(Expression::And(Box::new(var("a")), Box::new(var("b")))),
            Box::new(Expression::Or(Box::new(var("c")), Box::new(var("d")))),
        );

        let mut conjuncts = Vec::new();
        split_conjunction(&expression, &mut conjuncts);

        assert_eq!(
            conjuncts,
            vec![
                var("a"),
                var("b"),
                Expression::Or(Box::new(var("c")), Box::new(var("d")))
            ]
        );
    }

    #[test]
    fn test_nested_exists_is_found() {
        let exists = Expression::Exists(Box::new(GraphPattern::Bgp {
            patterns: Vec::new(),
        }));
        assert!(contains_exists(&Expression::Not(Box::new(exists.clone()))));
        assert!(contains_exists(&Expression::If(
            Box::new(var("a")),
            Box::new(var("b")),
            Box::new(exists)
        )));
        assert!(!contains_exists(&Expression::Bound(Variable::new_unchecked(
            "a"
        ))));
    }
}
