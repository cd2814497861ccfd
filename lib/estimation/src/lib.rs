//! Cardinality estimation for triple patterns.
//!
//! The optimizer only needs relative sizes to order joins. Three estimators are provided:
//!
//! - [ConstantEstimator] rates every pattern the same.
//! - [PatternEstimator] rates patterns by which slots are variables.
//! - [PeekEstimator] blends dictionary statistics with probes into the [TripleIndex] and
//!   memoizes the probes in concurrently filled caches.
//!
//! [TripleIndex]: hdtq_common::TripleIndex

pub mod cache;
mod estimator;
mod heuristic;
mod options;
mod peek;
mod prefetch;

pub use estimator::*;
pub use heuristic::statistical_estimate;
pub use options::*;
pub use peek::*;
pub use prefetch::PrefetchTask;
