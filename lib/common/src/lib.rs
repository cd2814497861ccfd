pub mod error;
mod index;

pub use index::*;

pub type DFResult<T> = datafusion::error::Result<T>;
