use hdtq_model::{Binding, Term, TriplePosition, Variable};
use std::fmt::{Display, Formatter};

/// Classifies which slots of a triple pattern hold the same variable.
///
/// The triple index has no notion of repeated variables. A pattern like `?x <p> ?x` is searched
/// as a wildcard on both slots and [SharedVars::matches] filters the results afterward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SharedVars {
    /// Every variable occurs exactly once.
    #[default]
    None,
    /// Subject and predicate share a variable.
    SubjectPredicate,
    /// Subject and object share a variable.
    SubjectObject,
    /// Predicate and object share a variable.
    PredicateObject,
    /// All three slots share a variable.
    All,
}

impl SharedVars {
    const fn ordinal(self) -> u8 {
        match self {
            SharedVars::None => 0,
            SharedVars::SubjectPredicate => 1,
            SharedVars::SubjectObject => 2,
            SharedVars::PredicateObject => 3,
            SharedVars::All => 4,
        }
    }

    /// Accumulates another pairwise co-reference.
    ///
    /// Two distinct pairs can only be observed together if all three slots co-refer, hence
    /// `SubjectPredicate` and `SubjectObject` combine to `All`.
    #[must_use]
    pub const fn combine(self, other: SharedVars) -> SharedVars {
        match (self, other) {
            (SharedVars::None, other) => other,
            (this, SharedVars::None) => this,
            (SharedVars::All, _) | (_, SharedVars::All) => SharedVars::All,
            (this, other) if this.ordinal() + other.ordinal() == 3 => SharedVars::All,
            (this, _) => this,
        }
    }

    /// Returns whether the given slot values of a search result satisfy the co-reference
    /// constraint.
    pub fn matches<T: PartialEq>(self, subject: &T, predicate: &T, object: &T) -> bool {
        match self {
            SharedVars::None => true,
            SharedVars::SubjectPredicate => subject == predicate,
            SharedVars::SubjectObject => subject == object,
            SharedVars::PredicateObject => predicate == object,
            SharedVars::All => subject == predicate && predicate == object,
        }
    }
}

/// The distinct variables of a triple pattern together with the slot each one first occupies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VarsInfo {
    names: Vec<Variable>,
    positions: Vec<TriplePosition>,
    shared_vars: SharedVars,
}

impl VarsInfo {
    /// Computes the [VarsInfo] of the triple `subject predicate object`.
    pub fn collect(subject: &Term, predicate: &Term, object: &Term) -> Self {
        let terms = [subject, predicate, object];
        let mut mask = 0u8;
        for position in TriplePosition::ALL {
            if terms[position.index()].is_variable() {
                mask |= position.mask_bit();
            }
        }

        let pairs = [
            (
                TriplePosition::Subject,
                TriplePosition::Predicate,
                SharedVars::SubjectPredicate,
            ),
            (
                TriplePosition::Subject,
                TriplePosition::Object,
                SharedVars::SubjectObject,
            ),
            (
                TriplePosition::Predicate,
                TriplePosition::Object,
                SharedVars::PredicateObject,
            ),
        ];
        let mut shared_vars = SharedVars::None;
        for (first, second, tag) in pairs {
            let (Some(lhs), Some(rhs)) = (
                terms[first.index()].as_variable(),
                terms[second.index()].as_variable(),
            ) else {
                continue;
            };
            if lhs == rhs {
                mask &= !second.mask_bit();
                shared_vars = shared_vars.combine(tag);
            }
        }

        let mut names = Vec::new();
        let mut positions = Vec::new();
        for position in TriplePosition::ALL {
            if mask & position.mask_bit() != 0 {
                if let Some(variable) = terms[position.index()].as_variable() {
                    names.push(variable.clone());
                    positions.push(position);
                }
            }
        }

        Self {
            names,
            positions,
            shared_vars,
        }
    }

    /// The distinct variables in subject, predicate, object order.
    pub fn names(&self) -> &[Variable] {
        &self.names
    }

    /// The slot each variable of [Self::names] first occupies.
    pub fn positions(&self) -> &[TriplePosition] {
        &self.positions
    }

    pub fn shared_vars(&self) -> SharedVars {
        self.shared_vars
    }
}

/// A triple of terms where each term may be a variable.
///
/// Equality is structural over the three terms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriplePatternNode {
    subject: Term,
    predicate: Term,
    object: Term,
    vars_info: VarsInfo,
}

impl TriplePatternNode {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        let subject = subject.into();
        let predicate = predicate.into();
        let object = object.into();
        let vars_info = VarsInfo::collect(&subject, &predicate, &object);
        Self {
            subject,
            predicate,
            object,
            vars_info,
        }
    }

    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn predicate(&self) -> &Term {
        &self.predicate
    }

    pub fn object(&self) -> &Term {
        &self.object
    }

    /// Returns the term in the given slot.
    pub fn term(&self, position: TriplePosition) -> &Term {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }

    pub fn vars_info(&self) -> &VarsInfo {
        &self.vars_info
    }

    /// The number of slots that hold a ground term.
    pub fn ground_count(&self) -> usize {
        TriplePosition::ALL
            .iter()
            .filter(|position| self.term(**position).is_ground())
            .count()
    }

    /// Substitutes the variables of `binding` in all three slots.
    #[must_use]
    pub fn bind(&self, binding: &Binding) -> Self {
        let bind_term = |term: &Term| match term.as_variable().and_then(|v| binding.get(v)) {
            Some(bound) => bound.clone(),
            None => term.clone(),
        };
        Self::new(
            bind_term(&self.subject),
            bind_term(&self.predicate),
            bind_term(&self.object),
        )
    }
}

impl Display for TriplePatternNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
