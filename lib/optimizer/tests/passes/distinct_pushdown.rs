use crate::test_utils::{greater, iri, tp, var};
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use hdtq_optimizer::{DistinctPushdownRule, OptimizerRule};
use insta::assert_snapshot;
use std::sync::Arc;

#[test]
fn test_join_operands_are_marked_below_distinct() -> DFResult<()> {
    let knows = tp(var("x"), iri("knows"), var("y"));
    let age = tp(var("y"), iri("age"), var("a"));
    let plan = Op::distinct(Op::join(vec![
        Arc::clone(&knows),
        Op::filter(Arc::clone(&age), vec![greater("a", 23)]),
    ]));

    let result = DistinctPushdownRule::new().rewrite(plan)?;

    assert!(result.transformed);
    assert_eq!(
        result.data,
        Op::distinct(Op::join(vec![
            Op::weak_distinct(knows),
            Op::weak_distinct(Op::filter(
                Op::weak_distinct(age),
                vec![greater("a", 23)]
            )),
        ]))
    );
    Ok(())
}

#[test]
fn test_marking_is_idempotent() -> DFResult<()> {
    let plan = Op::ask(Op::join(vec![
        tp(var("x"), iri("knows"), var("y")),
        tp(var("y"), iri("age"), var("a")),
    ]));

    let once = DistinctPushdownRule::new().rewrite(plan)?;
    let twice = DistinctPushdownRule::new().rewrite(Arc::clone(&once.data))?;

    assert!(once.transformed);
    assert!(!twice.transformed);
    assert_snapshot!(twice.data, @r"
    Ask
      Join
        WeakDistinct
          TriplePattern: ?x <http://ex/knows> ?y
        WeakDistinct
          TriplePattern: ?y <http://ex/age> ?a
    ");
    Ok(())
}

#[test]
fn test_limit_ends_distinct_context() -> DFResult<()> {
    let plan = Op::distinct(Op::limit(
        Op::join(vec![
            tp(var("x"), iri("knows"), var("y")),
            tp(var("y"), iri("age"), var("a")),
        ]),
        10,
    ));

    let result = DistinctPushdownRule::new().rewrite(Arc::clone(&plan))?;

    assert!(!result.transformed);
    assert!(Arc::ptr_eq(&result.data, &plan));
    Ok(())
}

#[test]
fn test_only_right_side_of_minus_is_marked() -> DFResult<()> {
    let plan = Op::minus(
        Op::join(vec![
            tp(var("x"), iri("knows"), var("y")),
            tp(var("y"), iri("age"), var("a")),
        ]),
        Op::join(vec![
            tp(var("y"), iri("blocked"), var("b")),
            tp(var("b"), iri("name"), iri("Bob")),
        ]),
    );

    let result = DistinctPushdownRule::new().rewrite(plan)?;

    assert_snapshot!(result.data, @r"
    Minus
      Join
        TriplePattern: ?x <http://ex/knows> ?y
        TriplePattern: ?y <http://ex/age> ?a
      Join
        WeakDistinct
          TriplePattern: ?y <http://ex/blocked> ?b
        WeakDistinct
          TriplePattern: ?b <http://ex/name> <http://ex/Bob>
    ");
    Ok(())
}
