use datafusion::error::DataFusionError;
use hdtq_model::BindingError;
use spargebra::SparqlSyntaxError;

/// An error raised while planning a SPARQL query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryPlanningError {
    /// An error in SPARQL parsing.
    #[error(transparent)]
    Parsing(#[from] SparqlSyntaxError),
    /// A `VALUES` clause binds the same variable twice.
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error("An error returned from the query engine: {0}")]
    Engine(DataFusionError),
    #[error("A feature has not yet been implemented: {0}")]
    NotImplemented(String),
}

impl From<DataFusionError> for QueryPlanningError {
    fn from(error: DataFusionError) -> Self {
        Self::Engine(error)
    }
}
