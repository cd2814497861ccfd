mod binding;
mod error;
mod position;
mod term;
pub mod vocab;

pub use binding::*;
pub use error::*;
pub use position::*;
pub use term::*;

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef, Triple, TripleRef,
    Variable, VariableNameParseError, VariableRef,
};
