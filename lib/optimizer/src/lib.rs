//! Rewrite passes over the hdtq algebra.
//!
//! Each pass is an [OptimizerRule]. The [Optimizer] applies a list of rules once each, ordered by
//! their priority:
//!
//! 1. Join ordering ([JoinOrderRule] or [FilterAwareJoinOrderRule])
//! 2. [FilterPushdownRule]
//! 3. [ProjectionPushdownRule]
//! 4. [DistinctPushdownRule]
//!
//! Use [create_optimizer_rules] to obtain the rules for a set of [OptimizerOptions].

mod cost;
mod distinct_pushdown;
mod filter_pushdown;
mod join_order;
mod optimizer;
mod options;
mod projection_pushdown;
mod rule;

pub use cost::estimate_cost;
pub use distinct_pushdown::DistinctPushdownRule;
pub use filter_pushdown::FilterPushdownRule;
pub use join_order::{FilterAwareJoinOrderRule, JoinOrderRule};
pub use optimizer::Optimizer;
pub use options::*;
pub use projection_pushdown::ProjectionPushdownRule;
pub use rule::{
    OptimizerRule, DISTINCT_PUSHDOWN_PRIORITY, FILTER_PUSHDOWN_PRIORITY, JOIN_ORDER_PRIORITY,
    PROJECTION_PUSHDOWN_PRIORITY,
};
