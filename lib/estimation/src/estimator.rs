use datafusion::common::plan_err;
use hdtq_algebra::TriplePatternNode;
use hdtq_common::DFResult;
use hdtq_model::TriplePosition;
use std::fmt::Debug;

/// Estimates how many triples match a triple pattern.
///
/// Estimates are only used to rank patterns against each other. They carry no exactness
/// guarantee.
pub trait CardinalityEstimator: Debug + Send + Sync {
    fn estimate(&self, pattern: &TriplePatternNode) -> DFResult<u64>;
}

/// Estimates every pattern as a single triple, which disables cost-based ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantEstimator;

impl CardinalityEstimator for ConstantEstimator {
    fn estimate(&self, _pattern: &TriplePatternNode) -> DFResult<u64> {
        Ok(1)
    }
}

/// Estimates patterns only by which of their slots hold a variable.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternEstimator;

impl PatternEstimator {
    /// Looks up the estimate for the given variable positions.
    ///
    /// The positions must be in subject, predicate, object order.
    pub fn estimate_positions(positions: &[TriplePosition]) -> DFResult<u64> {
        let estimate = match positions {
            [] => 1,
            [TriplePosition::Subject] => 1_000,
            [TriplePosition::Predicate] => 10,
            [TriplePosition::Object] => 20,
            [TriplePosition::Subject, TriplePosition::Predicate] => 2_000,
            [TriplePosition::Subject, TriplePosition::Object] => 10_000,
            [TriplePosition::Predicate, TriplePosition::Object] => 100,
            [TriplePosition::Subject, TriplePosition::Predicate, TriplePosition::Object] => {
                100_000
            }
            _ => {
                return plan_err!(
                    "Variable positions must be ordered by slot, got [{}]",
                    positions
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        };
        Ok(estimate)
    }
}

impl CardinalityEstimator for PatternEstimator {
    fn estimate(&self, pattern: &TriplePatternNode) -> DFResult<u64> {
        Self::estimate_positions(pattern.vars_info().positions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdtq_model::{NamedNode, Term, Variable};

    fn var(name: &str) -> Term {
        Variable::new_unchecked(name).into()
    }

    fn iri(value: &str) -> Term {
        NamedNode::new_unchecked(format!("http://example.com/{value}")).into()
    }

    fn estimate(s: Term, p: Term, o: Term) -> u64 {
        PatternEstimator
            .estimate(&TriplePatternNode::new(s, p, o))
            .unwrap()
    }

    #[test]
    fn pattern_table() {
        assert_eq!(estimate(iri("s"), iri("p"), iri("o")), 1);
        assert_eq!(estimate(var("s"), iri("p"), iri("o")), 1_000);
        assert_eq!(estimate(iri("s"), var("p"), iri("o")), 10);
        assert_eq!(estimate(iri("s"), iri("p"), var("o")), 20);
        assert_eq!(estimate(var("s"), var("p"), iri("o")), 2_000);
        assert_eq!(estimate(var("s"), iri("p"), var("o")), 10_000);
        assert_eq!(estimate(iri("s"), var("p"), var("o")), 100);
        assert_eq!(estimate(var("s"), var("p"), var("o")), 100_000);
    }

    #[test]
    fn co_referenced_variables_count_once() {
        assert_eq!(estimate(var("x"), iri("p"), var("x")), 1_000);
    }

    #[test]
    fn unordered_positions_are_rejected() {
        let result = PatternEstimator::estimate_positions(&[
            TriplePosition::Object,
            TriplePosition::Subject,
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn constant_estimator() {
        let pattern = TriplePatternNode::new(var("s"), var("p"), var("o"));
        assert_eq!(ConstantEstimator.estimate(&pattern).unwrap(), 1);
    }
}
