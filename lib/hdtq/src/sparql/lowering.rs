use crate::sparql::expression::{contains_exists, split_conjunction};
use crate::QueryPlanningError;
use hdtq_algebra::Op;
use hdtq_model::{Binding, BlankNode, Term, Variable};
use spargebra::algebra::{Expression, GraphPattern, PropertyPathExpression};
use spargebra::term::{GroundTerm, NamedNodePattern, TermPattern, TriplePattern};
use spargebra::Query;
use std::sync::Arc;

/// Lowers a `SELECT` or `ASK` query to an algebra tree.
///
/// Blank nodes of the query patterns become variables. The resulting tree is not flattened.
pub fn lower_query(query: &Query) -> Result<Arc<Op>, QueryPlanningError> {
    match query {
        Query::Select {
            dataset, pattern, ..
        } => {
            reject_dataset(dataset.is_some())?;
            lower_graph_pattern(pattern)
        }
        Query::Ask {
            dataset, pattern, ..
        } => {
            reject_dataset(dataset.is_some())?;
            Ok(Op::ask(lower_graph_pattern(pattern)?))
        }
        Query::Construct { .. } => not_implemented("CONSTRUCT queries"),
        Query::Describe { .. } => not_implemented("DESCRIBE queries"),
    }
}

#[allow(
    unreachable_patterns,
    reason = "LATERAL only exists if the sep-0006 feature of spargebra is enabled"
)]
fn lower_graph_pattern(pattern: &GraphPattern) -> Result<Arc<Op>, QueryPlanningError> {
    match pattern {
        GraphPattern::Bgp { patterns } => Ok(Op::join(
            patterns
                .iter()
                .map(lower_triple_pattern)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        GraphPattern::Path {
            subject,
            path,
            object,
        } => match path {
            PropertyPathExpression::NamedNode(predicate) => Ok(Op::triple_pattern(
                lower_term_pattern(subject)?,
                predicate.clone(),
                lower_term_pattern(object)?,
            )),
            _ => not_implemented("Property paths"),
        },
        GraphPattern::Join { left, right } => Ok(Op::join(vec![
            lower_graph_pattern(left)?,
            lower_graph_pattern(right)?,
        ])),
        GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => {
            let left = lower_graph_pattern(left)?;
            let mut right = lower_graph_pattern(right)?;
            if let Some(expression) = expression {
                reject_exists(expression)?;
                right = Op::filter(right, vec![expression.clone()]);
            }
            Ok(Op::left_join(vec![left, right]))
        }
        GraphPattern::Union { left, right } => Ok(Op::union(vec![
            lower_graph_pattern(left)?,
            lower_graph_pattern(right)?,
        ])),
        GraphPattern::Filter { expr, inner } => lower_filter(lower_graph_pattern(inner)?, expr),
        GraphPattern::Extend {
            inner,
            variable,
            expression,
        } => {
            reject_exists(expression)?;
            Ok(Op::assign(
                lower_graph_pattern(inner)?,
                vec![(variable.clone(), expression.clone())],
            ))
        }
        GraphPattern::Minus { left, right } => Ok(Op::minus(
            lower_graph_pattern(left)?,
            lower_graph_pattern(right)?,
        )),
        GraphPattern::Values {
            variables,
            bindings,
        } => {
            let rows = bindings
                .iter()
                .map(|row| lower_values_row(variables, row))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Op::values(Op::identity(), variables.clone(), rows))
        }
        GraphPattern::Project { inner, variables } => {
            Ok(Op::project(lower_graph_pattern(inner)?, variables.clone()))
        }
        GraphPattern::Distinct { inner } => Ok(Op::distinct(lower_graph_pattern(inner)?)),
        GraphPattern::Reduced { inner } => Ok(Op::weak_distinct(lower_graph_pattern(inner)?)),
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => {
            let inner = lower_graph_pattern(inner)?;
            Ok(match (*start, *length) {
                (0, None) => inner,
                (0, Some(limit)) => Op::limit(inner, limit),
                (offset, None) => Op::offset(inner, offset),
                (offset, Some(limit)) => Op::slice(inner, offset, limit),
            })
        }
        GraphPattern::OrderBy { .. } => not_implemented("ORDER BY"),
        GraphPattern::Group { .. } => not_implemented("GROUP BY and aggregates"),
        GraphPattern::Graph { .. } => not_implemented("GRAPH patterns"),
        GraphPattern::Service { .. } => not_implemented("SERVICE patterns"),
        _ => not_implemented("LATERAL patterns"),
    }
}

/// Lowers a `FILTER`.
///
/// Top-level `EXISTS` and `NOT EXISTS` conjuncts become semi-joins over the filtered pattern.
fn lower_filter(inner: Arc<Op>, expression: &Expression) -> Result<Arc<Op>, QueryPlanningError> {
    let mut conjuncts = Vec::new();
    split_conjunction(expression, &mut conjuncts);

    let mut expressions = Vec::new();
    let mut exists = Vec::new();
    for conjunct in conjuncts {
        match conjunct {
            Expression::Exists(pattern) => exists.push((true, lower_graph_pattern(&pattern)?)),
            Expression::Not(negated) => match *negated {
                Expression::Exists(pattern) => {
                    exists.push((false, lower_graph_pattern(&pattern)?));
                }
                negated => push_expression(&mut expressions, Expression::Not(Box::new(negated)))?,
            },
            conjunct => push_expression(&mut expressions, conjunct)?,
        }
    }

    let filtered = Op::filter(inner, expressions);
    Ok(exists
        .into_iter()
        .fold(filtered, |main, (positive, pattern)| {
            if positive {
                Op::exists(main, pattern)
            } else {
                Op::not_exists(main, pattern)
            }
        }))
}

fn push_expression(
    expressions: &mut Vec<Expression>,
    expression: Expression,
) -> Result<(), QueryPlanningError> {
    reject_exists(&expression)?;
    expressions.push(expression);
    Ok(())
}

fn lower_triple_pattern(pattern: &TriplePattern) -> Result<Arc<Op>, QueryPlanningError> {
    let predicate = match &pattern.predicate {
        NamedNodePattern::NamedNode(node) => Term::from(node.clone()),
        NamedNodePattern::Variable(variable) => Term::from(variable.clone()),
    };
    Ok(Op::triple_pattern(
        lower_term_pattern(&pattern.subject)?,
        predicate,
        lower_term_pattern(&pattern.object)?,
    ))
}

#[allow(
    unreachable_patterns,
    reason = "Quoted triples only exist if the rdf-star feature of spargebra is enabled"
)]
fn lower_term_pattern(pattern: &TermPattern) -> Result<Term, QueryPlanningError> {
    match pattern {
        TermPattern::NamedNode(node) => Ok(node.clone().into()),
        TermPattern::BlankNode(node) => Ok(blank_node_variable(node).into()),
        TermPattern::Literal(literal) => Ok(literal.clone().into()),
        TermPattern::Variable(variable) => Ok(variable.clone().into()),
        _ => not_implemented("Quoted triple patterns"),
    }
}

#[allow(
    unreachable_patterns,
    reason = "Quoted triples only exist if the rdf-star feature of spargebra is enabled"
)]
fn lower_ground_term(term: &GroundTerm) -> Result<Term, QueryPlanningError> {
    match term {
        GroundTerm::NamedNode(node) => Ok(node.clone().into()),
        GroundTerm::Literal(literal) => Ok(literal.clone().into()),
        _ => not_implemented("Quoted triples in VALUES"),
    }
}

/// Blank nodes in patterns act as variables that cannot be projected.
fn blank_node_variable(node: &BlankNode) -> Variable {
    Variable::new_unchecked(format!("_bnode_{}", node.as_str()))
}

/// Lowers a row of a `VALUES` clause. Undefined cells are left out of the binding.
fn lower_values_row(
    variables: &[Variable],
    row: &[Option<GroundTerm>],
) -> Result<Binding, QueryPlanningError> {
    let pairs = variables
        .iter()
        .zip(row)
        .filter_map(|(variable, term)| term.as_ref().map(|term| (variable, term)))
        .map(|(variable, term)| Ok((variable.clone(), lower_ground_term(term)?)))
        .collect::<Result<Vec<_>, QueryPlanningError>>()?;
    Ok(Binding::try_from_pairs(pairs)?)
}

fn reject_exists(expression: &Expression) -> Result<(), QueryPlanningError> {
    if contains_exists(expression) {
        return not_implemented("EXISTS nested within other expressions");
    }
    Ok(())
}

fn reject_dataset(has_dataset: bool) -> Result<(), QueryPlanningError> {
    if has_dataset {
        return not_implemented("FROM and FROM NAMED clauses");
    }
    Ok(())
}

fn not_implemented<T>(feature: &str) -> Result<T, QueryPlanningError> {
    Err(QueryPlanningError::NotImplemented(feature.to_owned()))
}
