//! Engine error type.

use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
