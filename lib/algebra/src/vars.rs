//! Helpers for the small, ordered variable lists the algebra works with.
//!
//! Variable lists are duplicate-free and ordered by first occurrence. They are usually tiny, so
//! they are kept as vectors instead of hash sets.

use hdtq_model::Variable;

/// Appends all variables of `vars` that are not yet contained in `target`.
pub fn extend_distinct<'a>(target: &mut Vec<Variable>, vars: impl IntoIterator<Item = &'a Variable>) {
    for var in vars {
        if !target.contains(var) {
            target.push(var.clone());
        }
    }
}

/// Returns the distinct variables of `vars` that are not contained in `excluded`.
pub fn difference<'a>(
    vars: impl IntoIterator<Item = &'a Variable>,
    excluded: &[Variable],
) -> Vec<Variable> {
    let mut result = Vec::new();
    extend_distinct(&mut result, vars.into_iter().filter(|v| !excluded.contains(v)));
    result
}

/// Returns whether `haystack` contains every variable of `needles`.
pub fn contains_all(haystack: &[Variable], needles: &[Variable]) -> bool {
    needles.iter().all(|v| haystack.contains(v))
}

/// Returns whether `lhs` and `rhs` share at least one variable.
pub fn intersects(lhs: &[Variable], rhs: &[Variable]) -> bool {
    lhs.iter().any(|v| rhs.contains(v))
}

/// The eagerly computed variable scope of a composite node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OpVars {
    output: Vec<Variable>,
    input: Vec<Variable>,
}

impl OpVars {
    pub fn new(output: Vec<Variable>, input: Vec<Variable>) -> Self {
        Self { output, input }
    }

    pub fn output(&self) -> &[Variable] {
        &self.output
    }

    pub fn input(&self) -> &[Variable] {
        &self.input
    }
}
