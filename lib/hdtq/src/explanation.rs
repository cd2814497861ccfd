use hdtq_algebra::Op;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Information about how a query is planned.
#[derive(Clone, Debug)]
pub struct QueryExplanation {
    /// The time spent parsing, lowering and optimizing the query.
    pub planning_time: Duration,
    /// The plan directly lowered from the SPARQL query.
    pub initial_plan: Arc<Op>,
    /// The plan after all optimizer passes ran.
    pub optimized_plan: Arc<Op>,
}

impl Display for QueryExplanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Initial Plan:")?;
        writeln!(f, "{}", self.initial_plan)?;
        writeln!(f, "Optimized Plan:")?;
        writeln!(f, "{}", self.optimized_plan)?;
        write!(f, "Planning Time: {:?}", self.planning_time)
    }
}
