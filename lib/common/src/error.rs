use datafusion::error::DataFusionError;
use std::error::Error;

/// An error related to triple index operations (dictionary lookups, searches...).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl From<StorageError> for DataFusionError {
    #[inline]
    fn from(error: StorageError) -> Self {
        DataFusionError::External(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_become_external_errors() {
        let error = DataFusionError::from(StorageError::Other("index unavailable".into()));

        let DataFusionError::External(inner) = &error else {
            panic!("expected an external error, got {error:?}");
        };
        assert_eq!(inner.to_string(), "index unavailable");
    }
}
