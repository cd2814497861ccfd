//! An in-memory implementation of the [TripleIndex](hdtq_common::TripleIndex) collaborator.

mod dictionary;
mod memory;
mod permutation;

pub use memory::MemTripleIndex;
