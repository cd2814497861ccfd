use crate::Op;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Renders the tree as an indented plan with one node per line.
impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl Op {
    fn fmt_indented(&self, f: &mut Formatter<'_>, indent: usize) -> std::fmt::Result {
        write!(f, "{:width$}", "", width = indent * 2)?;
        self.fmt_node(f)?;
        for child in self.children() {
            writeln!(f)?;
            child.fmt_indented(f, indent + 1)?;
        }
        Ok(())
    }

    fn fmt_node(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::TriplePattern(node) => write!(f, "TriplePattern: {node}"),
            Op::Filter(node) => write!(f, "Filter: {}", node.expressions().iter().join(", ")),
            Op::Assign(node) => write!(
                f,
                "Assign: {}",
                node.assignments()
                    .iter()
                    .map(|(variable, expression)| format!("{variable} := {expression}"))
                    .join(", ")
            ),
            Op::Project(node) => write!(f, "Project: {}", node.variables().iter().join(", ")),
            Op::Limit { limit, .. } => write!(f, "Limit: {limit}"),
            Op::Offset { offset, .. } => write!(f, "Offset: {offset}"),
            Op::Slice { offset, limit, .. } => {
                write!(f, "Slice: offset={offset}, limit={limit}")
            }
            Op::Values(node) => write!(
                f,
                "Values: {}, rows={}",
                node.variables().iter().join(" "),
                node.rows().len()
            ),
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdtq_model::{NamedNode, Term, Variable};
    use insta::assert_snapshot;

    fn var(name: &str) -> Term {
        Variable::new_unchecked(name).into()
    }

    fn iri(value: &str) -> Term {
        NamedNode::new_unchecked(format!("http://ex/{value}")).into()
    }

    #[test]
    fn renders_indented_plan() {
        let plan = Op::slice(
            Op::project(
                Op::join(vec![
                    Op::triple_pattern(var("x"), iri("knows"), var("y")),
                    Op::minus(
                        Op::triple_pattern(var("y"), iri("name"), var("n")),
                        Op::triple_pattern(var("y"), iri("age"), var("a")),
                    ),
                ]),
                vec![Variable::new_unchecked("x"), Variable::new_unchecked("n")],
            ),
            5,
            10,
        );

        assert_snapshot!(plan, @r"
        Slice: offset=5, limit=10
          Project: ?x, ?n
            Join
              TriplePattern: ?x <http://ex/knows> ?y
              Minus
                TriplePattern: ?y <http://ex/name> ?n
                TriplePattern: ?y <http://ex/age> ?a
        ");
    }
}
