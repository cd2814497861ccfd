use crate::test_utils::{iri, tp, var, variable};
use datafusion::common::plan_err;
use datafusion::common::tree_node::Transformed;
use hdtq_algebra::Op;
use hdtq_common::DFResult;
use hdtq_estimation::PatternEstimator;
use hdtq_optimizer::{
    create_optimizer_rules, DistinctPushdownRule, JoinOrderRule, OptimizationLevel, Optimizer,
    OptimizerOptions, OptimizerRule, ProjectionPushdownRule,
};
use insta::assert_snapshot;
use std::sync::Arc;

#[derive(Debug)]
struct FailingRule;

impl OptimizerRule for FailingRule {
    fn name(&self) -> &str {
        "failing"
    }

    fn priority(&self) -> u32 {
        0
    }

    fn rewrite(&self, _op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
        plan_err!("Cannot rewrite")
    }
}

fn star_query() -> Arc<Op> {
    Op::distinct(Op::project(
        Op::join(vec![
            tp(var("x"), iri("name"), var("n")),
            tp(var("x"), iri("knows"), iri("Alice")),
        ]),
        vec![variable("n")],
    ))
}

#[test]
fn test_rules_run_by_priority() {
    let optimizer = Optimizer::new(vec![
        Arc::new(DistinctPushdownRule::new()),
        Arc::new(ProjectionPushdownRule::new()),
        Arc::new(JoinOrderRule::new(Arc::new(PatternEstimator))),
    ]);

    let names = optimizer
        .rules()
        .iter()
        .map(|rule| rule.name())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        ["join-order", "projection-pushdown", "distinct-pushdown"]
    );
}

#[test]
fn test_full_optimization() -> DFResult<()> {
    let rules = create_optimizer_rules(Arc::new(PatternEstimator), &OptimizerOptions::default());
    let result = Optimizer::new(rules).optimize(star_query())?;

    assert!(result.transformed);
    assert_snapshot!(result.data, @r"
    Distinct
      Project: ?n
        Join
          WeakDistinct
            TriplePattern: ?x <http://ex/knows> <http://ex/Alice>
          WeakDistinct
            TriplePattern: ?x <http://ex/name> ?n
    ");
    Ok(())
}

#[test]
fn test_no_optimization() -> DFResult<()> {
    let options = OptimizerOptions::from_level(OptimizationLevel::None);
    let plan = star_query();
    let result =
        Optimizer::new(create_optimizer_rules(Arc::new(PatternEstimator), &options))
            .optimize(Arc::clone(&plan))?;

    assert!(!result.transformed);
    assert!(Arc::ptr_eq(&result.data, &plan));
    Ok(())
}

#[test]
fn test_failing_rule_is_named() {
    let result = Optimizer::new(vec![Arc::new(FailingRule)]).optimize(star_query());

    let Err(error) = result else {
        panic!("The failing rule must abort the optimization");
    };
    assert!(error
        .to_string()
        .starts_with("Optimizer rule 'failing' failed"));
}
