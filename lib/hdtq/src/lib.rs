//! Query planning for SPARQL over compressed, dictionary-encoded triple indices.
//!
//! The [QueryPlanner] parses a SPARQL query with [spargebra], lowers it to the [hdtq_algebra]
//! tree and optimizes it with the passes of [hdtq_optimizer]. Join ordering is driven by a
//! cardinality estimator from [hdtq_estimation] that probes the [TripleIndex](hdtq_common::TripleIndex).
//!
//! ```
//! use hdtq::{QueryOptions, QueryPlanner};
//! use hdtq_storage::MemTripleIndex;
//! use std::sync::Arc;
//!
//! let index = Arc::new(MemTripleIndex::try_new(Vec::new())?);
//! let planner = QueryPlanner::try_new(index, QueryOptions::default())?;
//! let explanation = planner.plan("SELECT ?s WHERE { ?s ?p ?o }")?;
//! println!("{}", explanation.optimized_plan);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod error;
mod explanation;
mod options;
mod planner;
pub mod sparql;

pub use error::QueryPlanningError;
pub use explanation::QueryExplanation;
pub use hdtq_estimation::{EstimatorKind, EstimatorOptions, LookupMode};
pub use hdtq_optimizer::{JoinOrdering, OptimizationLevel, OptimizerOptions};
pub use options::QueryOptions;
pub use planner::QueryPlanner;

pub mod algebra {
    pub use hdtq_algebra::*;
}

pub mod model {
    pub use hdtq_model::*;
}
