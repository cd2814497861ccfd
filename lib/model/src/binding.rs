use crate::{BindingError, Term};
use oxrdf::Variable;

/// An ordered, partial assignment of variables to terms.
///
/// The binding is backed by two parallel vectors. The position of a variable in
/// [Binding::variables] is also the position of its term in [Binding::terms].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Binding {
    variables: Vec<Variable>,
    terms: Vec<Term>,
}

impl Binding {
    /// Creates a new [Binding] from two parallel vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ or if a variable is given more than once.
    pub fn try_new(variables: Vec<Variable>, terms: Vec<Term>) -> Result<Self, BindingError> {
        if variables.len() != terms.len() {
            return Err(BindingError::LengthMismatch {
                variables: variables.len(),
                terms: terms.len(),
            });
        }

        for (i, variable) in variables.iter().enumerate() {
            if variables[..i].contains(variable) {
                return Err(BindingError::DuplicateVariable(variable.clone()));
            }
        }

        Ok(Self { variables, terms })
    }

    /// Creates a new [Binding] from `(variable, term)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is given more than once.
    pub fn try_from_pairs(
        pairs: impl IntoIterator<Item = (Variable, Term)>,
    ) -> Result<Self, BindingError> {
        let (variables, terms) = pairs.into_iter().unzip();
        Self::try_new(variables, terms)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns the term bound to `variable`.
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.get_by_name(variable.as_str())
    }

    /// Returns the term bound to the variable called `name` (without the `?` sigil).
    pub fn get_by_name(&self, name: &str) -> Option<&Term> {
        self.variables
            .iter()
            .position(|v| v.as_str() == name)
            .map(|i| &self.terms[i])
    }

    /// Returns the `i`-th assignment.
    pub fn get_by_index(&self, i: usize) -> Option<(&Variable, &Term)> {
        Some((self.variables.get(i)?, self.terms.get(i)?))
    }

    /// Returns whether `variable` is assigned by this binding.
    pub fn contains(&self, variable: &Variable) -> bool {
        self.variables.contains(variable)
    }

    /// Returns whether this binding assigns any of the given `variables`.
    pub fn intersects(&self, variables: &[Variable]) -> bool {
        variables.iter().any(|v| self.contains(v))
    }

    /// Returns a new binding that only contains the assignments whose variable satisfies
    /// `predicate`. The relative order is retained.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&Variable) -> bool) -> Binding {
        let (variables, terms) = self
            .iter()
            .filter(|(variable, _)| predicate(variable))
            .map(|(variable, term)| (variable.clone(), term.clone()))
            .unzip();
        Self { variables, terms }
    }

    /// Iterates over the assignments in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.variables.iter().zip(self.terms.iter())
    }
}
