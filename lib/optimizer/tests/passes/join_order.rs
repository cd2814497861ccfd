use crate::test_utils::{greater, iri, tp, var, variable};
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use hdtq_estimation::PatternEstimator;
use hdtq_optimizer::{FilterAwareJoinOrderRule, JoinOrderRule, OptimizerRule};
use insta::assert_snapshot;
use std::sync::Arc;

fn join_order() -> JoinOrderRule {
    JoinOrderRule::new(Arc::new(PatternEstimator))
}

#[test]
fn test_cheaper_operand_moves_first() -> DFResult<()> {
    let name = tp(var("x"), iri("name"), var("y"));
    let knows = tp(var("x"), iri("knows"), iri("Alice"));

    let result = join_order().rewrite(Op::join(vec![Arc::clone(&name), Arc::clone(&knows)]))?;

    assert!(result.transformed);
    assert_eq!(result.data, Op::join(vec![knows, name]));
    Ok(())
}

#[test]
fn test_sorted_join_is_unchanged() -> DFResult<()> {
    let plan = Op::join(vec![
        tp(var("x"), iri("knows"), iri("Alice")),
        tp(var("x"), iri("name"), var("y")),
    ]);

    let result = join_order().rewrite(Arc::clone(&plan))?;

    assert!(!result.transformed);
    assert!(Arc::ptr_eq(&result.data, &plan));
    Ok(())
}

#[test]
fn test_avoids_cartesian_product() -> DFResult<()> {
    let a = tp(iri("s"), var("x"), var("y"));
    let b = tp(iri("s2"), var("z"), var("w"));
    let c = tp(var("x"), iri("p"), iri("o"));

    let result = join_order().rewrite(Op::join(vec![
        Arc::clone(&a),
        Arc::clone(&b),
        Arc::clone(&c),
    ]))?;

    assert_eq!(result.data, Op::join(vec![a, c, b]));
    Ok(())
}

#[test]
fn test_restores_output_order() -> DFResult<()> {
    let plan = Op::join(vec![
        tp(var("a"), iri("p"), var("b")),
        tp(var("b"), iri("q"), iri("o")),
    ]);

    let result = join_order().rewrite(plan)?;

    assert_snapshot!(result.data, @r"
    Project: ?a, ?b
      Join
        TriplePattern: ?b <http://ex/q> <http://ex/o>
        TriplePattern: ?a <http://ex/p> ?b
    ");
    assert_eq!(
        result.data.output_vars(),
        [variable("a"), variable("b")].as_slice()
    );
    Ok(())
}

#[test]
fn test_orders_nested_joins() -> DFResult<()> {
    let name = tp(var("x"), iri("name"), var("y"));
    let knows = tp(var("x"), iri("knows"), iri("Alice"));
    let age = tp(var("x"), iri("age"), var("a"));

    let result = join_order().rewrite(Op::minus(
        Op::join(vec![Arc::clone(&name), Arc::clone(&knows)]),
        Arc::clone(&age),
    ))?;

    assert_eq!(
        result.data,
        Op::minus(Op::join(vec![knows, name]), age)
    );
    Ok(())
}

#[test]
fn test_filter_aware_prefers_filtered_operand() -> DFResult<()> {
    let name = tp(var("x"), iri("name"), iri("Bob"));
    let age = tp(var("x"), iri("age"), var("y"));
    let plan = Op::filter(
        Op::join(vec![Arc::clone(&name), Arc::clone(&age)]),
        vec![greater("y", 23)],
    );

    let plain = join_order().rewrite(Arc::clone(&plan))?;
    assert!(!plain.transformed);

    let filter_aware = FilterAwareJoinOrderRule::new(Arc::new(PatternEstimator), 20.0);
    let result = filter_aware.rewrite(plan)?;

    assert!(result.transformed);
    assert_eq!(
        result.data,
        Op::filter(Op::join(vec![age, name]), vec![greater("y", 23)])
    );
    Ok(())
}

#[test]
fn test_filter_aware_ignores_filters_outside_join() -> DFResult<()> {
    let plan = Op::filter(
        Op::join(vec![
            tp(var("x"), iri("name"), iri("Bob")),
            tp(var("x"), iri("age"), var("y")),
        ]),
        vec![greater("q", 23)],
    );

    let filter_aware = FilterAwareJoinOrderRule::new(Arc::new(PatternEstimator), 20.0);
    let result = filter_aware.rewrite(Arc::clone(&plan))?;

    assert!(!result.transformed);
    assert!(Arc::ptr_eq(&result.data, &plan));
    Ok(())
}

#[test]
fn test_filter_aware_prefers_operands_shared_with_minus() -> DFResult<()> {
    let name = tp(var("x"), iri("name"), iri("Bob"));
    let age = tp(var("x"), iri("age"), var("y"));
    let excluded = tp(var("y"), iri("p"), iri("o"));
    let plan = Op::minus(
        Op::join(vec![Arc::clone(&name), Arc::clone(&age)]),
        Arc::clone(&excluded),
    );

    let filter_aware = FilterAwareJoinOrderRule::new(Arc::new(PatternEstimator), 20.0);
    let result = filter_aware.rewrite(plan)?;

    assert_eq!(
        result.data,
        Op::minus(Op::join(vec![age, name]), excluded)
    );
    Ok(())
}
