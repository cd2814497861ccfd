//! Lowering of parsed SPARQL queries to the [Op](hdtq_algebra::Op) algebra.

mod expression;
mod lowering;

pub use lowering::lower_query;
