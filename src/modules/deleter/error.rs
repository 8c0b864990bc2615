use thiserror::Error;

use crate::config::prompt::{OperatorError, PromptError};

#[derive(Error, Debug)]
pub enum DeleterError {
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Input error: {0}")]
    Prompt(#[from] PromptError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Earlier batches stay deleted; nothing is rolled back.
    #[error("Batch {batch} of {batches} failed after {deleted} documents were deleted: {source}")]
    BatchFailed {
        batch: usize,
        batches: usize,
        deleted: u64,
        #[source]
        source: mongodb::error::Error,
    },
}

impl DeleterError {
    pub fn is_validation(&self) -> bool {
        matches!(self, DeleterError::Validation(_))
    }
}

impl From<validator::ValidationErrors> for DeleterError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DeleterError::Validation(errors.to_string())
    }
}

impl OperatorError for DeleterError {
    fn is_validation(&self) -> bool {
        DeleterError::is_validation(self)
    }
}
