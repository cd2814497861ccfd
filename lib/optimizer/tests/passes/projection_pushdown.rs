use crate::test_utils::{greater, iri, tp, var, variable};
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use hdtq_optimizer::{OptimizerRule, ProjectionPushdownRule};
use insta::assert_snapshot;
use std::sync::Arc;

fn social_union() -> Arc<Op> {
    Op::union(vec![
        tp(var("x"), iri("knows"), var("y")),
        tp(var("x"), iri("likes"), var("y")),
    ])
}

#[test]
fn test_operand_is_trimmed_to_useful_variables() -> DFResult<()> {
    let plan = Op::project(
        Op::join(vec![social_union(), tp(var("y"), iri("name"), var("n"))]),
        vec![variable("n")],
    );

    let result = ProjectionPushdownRule::new().rewrite(plan)?;

    assert!(result.transformed);
    assert_snapshot!(result.data, @r"
    Project: ?n
      Join
        Project: ?y
          Union
            TriplePattern: ?x <http://ex/knows> ?y
            TriplePattern: ?x <http://ex/likes> ?y
        TriplePattern: ?y <http://ex/name> ?n
    ");
    Ok(())
}

#[test]
fn test_ask_keeps_only_join_variables() -> DFResult<()> {
    let plan = Op::ask(Op::join(vec![
        tp(var("z"), iri("follows"), var("x")),
        social_union(),
    ]));

    let result = ProjectionPushdownRule::new().rewrite(plan)?;

    assert_snapshot!(result.data, @r"
    Ask
      Join
        TriplePattern: ?z <http://ex/follows> ?x
        Project: ?x
          Union
            TriplePattern: ?x <http://ex/knows> ?y
            TriplePattern: ?x <http://ex/likes> ?y
    ");
    Ok(())
}

#[test]
fn test_filter_variables_stay_useful() -> DFResult<()> {
    let plan = Op::project(
        Op::filter(social_union(), vec![greater("y", 1)]),
        vec![variable("x")],
    );

    let result = ProjectionPushdownRule::new().rewrite(Arc::clone(&plan))?;

    assert!(!result.transformed);
    assert!(Arc::ptr_eq(&result.data, &plan));
    Ok(())
}

#[test]
fn test_distinct_keeps_all_variables() -> DFResult<()> {
    let plan = Op::project(
        Op::distinct(Op::join(vec![
            tp(var("z"), iri("follows"), var("x")),
            social_union(),
        ])),
        vec![variable("z")],
    );

    let result = ProjectionPushdownRule::new().rewrite(Arc::clone(&plan))?;

    assert!(!result.transformed);
    Ok(())
}

#[test]
fn test_nested_projection_is_trimmed() -> DFResult<()> {
    let plan = Op::project(
        Op::join(vec![
            tp(var("z"), iri("follows"), var("x")),
            Op::project(social_union(), vec![variable("x"), variable("y")]),
        ]),
        vec![variable("z")],
    );

    let result = ProjectionPushdownRule::new().rewrite(plan)?;

    assert_snapshot!(result.data, @r"
    Project: ?z
      Join
        TriplePattern: ?z <http://ex/follows> ?x
        Project: ?x
          Union
            TriplePattern: ?x <http://ex/knows> ?y
            TriplePattern: ?x <http://ex/likes> ?y
    ");
    Ok(())
}
