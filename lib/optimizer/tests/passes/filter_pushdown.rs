use crate::test_utils::{greater, iri, same_term, tp, var, variable};
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use hdtq_optimizer::{FilterPushdownRule, OptimizerRule};
use spargebra::algebra::Expression;
use std::sync::Arc;

fn assert_unchanged(plan: Arc<Op>) -> DFResult<()> {
    let result = FilterPushdownRule::new().rewrite(Arc::clone(&plan))?;
    assert!(!result.transformed);
    assert!(Arc::ptr_eq(&result.data, &plan));
    Ok(())
}

#[test]
fn test_filter_moves_to_covering_operand() -> DFResult<()> {
    let knows = tp(iri("Alice"), iri("knows"), var("x"));
    let age = tp(var("x"), iri("age"), var("y"));
    let plan = Op::filter(
        Op::join(vec![Arc::clone(&knows), Arc::clone(&age)]),
        vec![greater("y", 23)],
    );

    let result = FilterPushdownRule::new().rewrite(plan)?;

    assert!(result.transformed);
    assert_eq!(
        result.data,
        Op::join(vec![knows, Op::filter(age, vec![greater("y", 23)])])
    );
    Ok(())
}

#[test]
fn test_filter_spanning_all_operands_stays() -> DFResult<()> {
    assert_unchanged(Op::filter(
        Op::join(vec![
            tp(var("x"), iri("p"), var("a")),
            tp(var("b"), iri("p"), var("c")),
            tp(var("d"), iri("p"), var("y")),
        ]),
        vec![same_term("x", "y")],
    ))
}

#[test]
fn test_filter_groups_contiguous_operands() -> DFResult<()> {
    let first = tp(var("x"), iri("p"), var("a"));
    let second = tp(var("a"), iri("p"), var("y"));
    let third = tp(var("z"), iri("p"), var("w"));
    let plan = Op::filter(
        Op::join(vec![
            Arc::clone(&first),
            Arc::clone(&second),
            Arc::clone(&third),
        ]),
        vec![same_term("x", "y")],
    );

    let result = FilterPushdownRule::new().rewrite(plan)?;

    assert_eq!(
        result.data,
        Op::join(vec![
            Op::filter(Op::join(vec![first, second]), vec![same_term("x", "y")]),
            third,
        ])
    );
    Ok(())
}

#[test]
fn test_filter_is_copied_into_union_branches() -> DFResult<()> {
    let knows = tp(var("x"), iri("knows"), var("y"));
    let likes = tp(var("x"), iri("likes"), var("y"));
    let plan = Op::filter(
        Op::union(vec![Arc::clone(&knows), Arc::clone(&likes)]),
        vec![greater("y", 1)],
    );

    let result = FilterPushdownRule::new().rewrite(plan)?;

    assert_eq!(
        result.data,
        Op::union(vec![
            Op::filter(knows, vec![greater("y", 1)]),
            Op::filter(likes, vec![greater("y", 1)]),
        ])
    );
    Ok(())
}

#[test]
fn test_filter_passes_distinct_and_project() -> DFResult<()> {
    let knows = tp(iri("Alice"), iri("knows"), var("x"));
    let age = tp(var("x"), iri("age"), var("y"));
    let plan = Op::filter(
        Op::distinct(Op::project(
            Op::join(vec![Arc::clone(&knows), Arc::clone(&age)]),
            vec![variable("y")],
        )),
        vec![greater("y", 23)],
    );

    let result = FilterPushdownRule::new().rewrite(plan)?;

    assert_eq!(
        result.data,
        Op::distinct(Op::project(
            Op::join(vec![knows, Op::filter(age, vec![greater("y", 23)])]),
            vec![variable("y")],
        ))
    );
    Ok(())
}

#[test]
fn test_filter_stays_above_limit() -> DFResult<()> {
    assert_unchanged(Op::filter(
        Op::limit(
            Op::join(vec![
                tp(iri("Alice"), iri("knows"), var("x")),
                tp(var("x"), iri("age"), var("y")),
            ]),
            10,
        ),
        vec![greater("y", 23)],
    ))
}

#[test]
fn test_filter_on_assigned_variable_stays() -> DFResult<()> {
    assert_unchanged(Op::filter(
        Op::assign(
            tp(var("x"), iri("age"), var("y")),
            vec![(variable("z"), Expression::Variable(variable("y")))],
        ),
        vec![greater("z", 23)],
    ))
}

#[test]
fn test_filter_only_enters_required_side_of_left_join() -> DFResult<()> {
    let required = tp(var("x"), iri("age"), var("y"));
    let optional = tp(var("x"), iri("name"), var("z"));
    let plan = Op::filter(
        Op::left_join(vec![Arc::clone(&required), Arc::clone(&optional)]),
        vec![greater("y", 23)],
    );

    let result = FilterPushdownRule::new().rewrite(plan)?;
    assert_eq!(
        result.data,
        Op::left_join(vec![
            Op::filter(Arc::clone(&required), vec![greater("y", 23)]),
            Arc::clone(&optional),
        ])
    );

    assert_unchanged(Op::filter(
        Op::left_join(vec![required, optional]),
        vec![greater("z", 23)],
    ))
}

#[test]
fn test_filter_enters_main_side_of_minus() -> DFResult<()> {
    let knows = tp(iri("Alice"), iri("knows"), var("x"));
    let age = tp(var("x"), iri("age"), var("y"));
    let excluded = tp(var("x"), iri("blocked"), iri("Bob"));
    let plan = Op::filter(
        Op::minus(
            Op::join(vec![Arc::clone(&knows), Arc::clone(&age)]),
            Arc::clone(&excluded),
        ),
        vec![greater("y", 23)],
    );

    let result = FilterPushdownRule::new().rewrite(plan)?;

    assert_eq!(
        result.data,
        Op::minus(
            Op::join(vec![knows, Op::filter(age, vec![greater("y", 23)])]),
            excluded,
        )
    );
    Ok(())
}
