use oxrdf::{BlankNode, Literal, NamedNode, Variable};
use std::fmt;
use std::fmt::{Display, Formatter};

/// An RDF term as it appears in the query algebra.
///
/// Terms are immutable and compared by content. A variable is equal to another variable iff
/// their names (without the `?` sigil) match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
}

impl Term {
    /// Returns whether this term is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Returns whether this term is ground, i.e., not a variable.
    pub fn is_ground(&self) -> bool {
        !self.is_variable()
    }

    /// Returns the variable if this term is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(variable) => Some(variable),
            _ => None,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(inner) => inner.fmt(f),
            Term::BlankNode(inner) => inner.fmt(f),
            Term::Literal(inner) => inner.fmt(f),
            Term::Variable(inner) => inner.fmt(f),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(value: NamedNode) -> Self {
        Term::NamedNode(value)
    }
}

impl From<BlankNode> for Term {
    fn from(value: BlankNode) -> Self {
        Term::BlankNode(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Literal(value)
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Term::Variable(value)
    }
}

impl From<oxrdf::NamedNodeRef<'_>> for Term {
    fn from(value: oxrdf::NamedNodeRef<'_>) -> Self {
        Term::NamedNode(value.into_owned())
    }
}
