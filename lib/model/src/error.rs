use oxrdf::Variable;
use thiserror::Error;

/// An error raised while assembling a [Binding](crate::Binding).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    /// The number of variables does not match the number of terms.
    #[error("Binding has {variables} variables but {terms} terms")]
    LengthMismatch { variables: usize, terms: usize },
    /// The same variable was given more than once.
    #[error("Variable {0} is bound more than once")]
    DuplicateVariable(Variable),
}
