use crate::Op;
use datafusion::common::tree_node::{Transformed, TreeNode};
use hdtq_common::DFResult;
use std::sync::Arc;

impl Op {
    /// Absorbs the operands of directly nested nodes of the same kind and drops [Op::Identity]
    /// operands.
    ///
    /// Only applies to `Join` and `Union` and only looks one level deep.
    pub fn flatten_once(self: &Arc<Self>) -> Transformed<Arc<Op>> {
        let (operands, is_join) = match self.as_ref() {
            Op::Join(node) => (node.operands(), true),
            Op::Union(node) => (node.operands(), false),
            _ => return Transformed::no(Arc::clone(self)),
        };

        let absorbs = |operand: &Arc<Op>| match operand.as_ref() {
            Op::Identity => true,
            Op::Join(_) => is_join,
            Op::Union(_) => !is_join,
            _ => false,
        };
        if !operands.iter().any(absorbs) {
            return Transformed::no(Arc::clone(self));
        }

        let mut flattened = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand.as_ref() {
                Op::Identity => {}
                Op::Join(nested) if is_join => flattened.extend(nested.operands().iter().cloned()),
                Op::Union(nested) if !is_join => {
                    flattened.extend(nested.operands().iter().cloned())
                }
                _ => flattened.push(Arc::clone(operand)),
            }
        }

        let result = if is_join {
            Op::join(flattened)
        } else {
            Op::union(flattened)
        };
        Transformed::yes(result)
    }
}

/// Recursively flattens the tree bottom-up.
///
/// In addition to [Op::flatten_once], nested filters are merged into a single filter and a
/// filter over [Op::Identity] collapses to [Op::Identity].
pub fn flatten(op: Arc<Op>) -> DFResult<Transformed<Arc<Op>>> {
    op.transform_up(|node| Ok(flatten_node(node)))
}

fn flatten_node(node: Arc<Op>) -> Transformed<Arc<Op>> {
    let Op::Filter(filter) = node.as_ref() else {
        return node.flatten_once();
    };

    match filter.inner().as_ref() {
        Op::Identity => Transformed::yes(Op::identity()),
        Op::Filter(nested) => {
            let mut expressions = nested.expressions().to_vec();
            expressions.extend(filter.expressions().iter().cloned());
            Transformed::yes(Op::filter(Arc::clone(nested.inner()), expressions))
        }
        _ => Transformed::no(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdtq_model::{NamedNode, Term, Variable};
    use spargebra::algebra::Expression;

    fn tp(s: &str, p: &str, o: &str) -> Arc<Op> {
        Op::triple_pattern(var(s), NamedNode::new_unchecked(format!("http://ex/{p}")), var(o))
    }

    fn var(name: &str) -> Term {
        Variable::new_unchecked(name).into()
    }

    fn bound(name: &str) -> Expression {
        Expression::Bound(Variable::new_unchecked(name))
    }

    #[test]
    fn flatten_is_associative() -> DFResult<()> {
        let (a, b, c) = (tp("a", "p", "b"), tp("b", "p", "c"), tp("c", "p", "d"));

        let nested = Op::join(vec![Arc::clone(&a), Op::join(vec![Arc::clone(&b), Arc::clone(&c)])]);
        let flat = Op::join(vec![a, b, c]);

        assert_eq!(flatten(nested)?.data, flatten(flat)?.data);
        Ok(())
    }

    #[test]
    fn identity_is_neutral() -> DFResult<()> {
        let pattern = tp("x", "p", "y");

        let join = Op::join(vec![Op::identity(), Arc::clone(&pattern)]);
        assert_eq!(flatten(join)?.data, pattern);

        let union = Op::union(vec![Arc::clone(&pattern), Op::identity()]);
        assert_eq!(flatten(union)?.data, pattern);
        Ok(())
    }

    #[test]
    fn flatten_once_only_absorbs_one_level() {
        let (a, b, c, d) = (
            tp("a", "p", "b"),
            tp("b", "p", "c"),
            tp("c", "p", "d"),
            tp("d", "p", "e"),
        );
        let deep = Op::join(vec![Arc::clone(&c), Arc::clone(&d)]);
        let middle = Op::join(vec![Arc::clone(&b), Op::union(vec![deep, Op::identity()])]);
        let root = Op::join(vec![Arc::clone(&a), middle]);

        let flattened = root.flatten_once();
        assert!(flattened.transformed);
        assert_eq!(flattened.data.children().len(), 3);
        assert!(matches!(flattened.data.children()[2].as_ref(), Op::Union(_)));
    }

    #[test]
    fn join_and_union_are_not_merged() {
        let union = Op::union(vec![tp("a", "p", "b"), tp("c", "p", "d")]);
        let join = Op::join(vec![tp("x", "p", "y"), union]);

        let flattened = join.flatten_once();
        assert!(!flattened.transformed);
        assert!(Arc::ptr_eq(&flattened.data, &join));
    }

    #[test]
    fn nested_filters_are_merged() -> DFResult<()> {
        let pattern = tp("x", "p", "y");
        let nested = Op::filter(
            Op::filter(Arc::clone(&pattern), vec![bound("x")]),
            vec![bound("y")],
        );

        let expected = Op::filter(pattern, vec![bound("x"), bound("y")]);
        assert_eq!(flatten(nested)?.data, expected);
        Ok(())
    }

    #[test]
    fn filter_over_identity_collapses() -> DFResult<()> {
        let filter = Op::filter(Op::join(vec![]), vec![bound("x")]);

        assert_eq!(flatten(filter)?.data, Op::identity());
        Ok(())
    }
}
