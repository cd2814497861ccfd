//! The query algebra of hdtq.
//!
//! A query is represented as an immutable tree of [Op] nodes. Each node knows which variables it
//! exposes ([Op::output_vars]) and which free variables it expects from its context
//! ([Op::input_vars]). Rewrites never mutate a tree; they build new nodes and report whether
//! anything changed through DataFusion's [Transformed](datafusion::common::tree_node::Transformed).

mod bind;
mod display;
mod expression;
mod filter;
mod flatten;
mod join;
mod op;
mod project;
mod semi_join;
mod tree_node;
mod triple_pattern;
mod values;
pub mod vars;

pub use expression::*;
pub use filter::*;
pub use flatten::flatten;
pub use join::*;
pub use op::*;
pub use project::*;
pub use semi_join::*;
pub use triple_pattern::*;
pub use values::*;
