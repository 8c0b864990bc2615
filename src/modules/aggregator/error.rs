use thiserror::Error;

use crate::config::prompt::{OperatorError, PromptError};

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Input error: {0}")]
    Prompt(#[from] PromptError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unexpected count result: {0}")]
    InvalidCount(String),
}

impl AggregatorError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AggregatorError::Validation(_))
    }
}

impl From<validator::ValidationErrors> for AggregatorError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AggregatorError::Validation(errors.to_string())
    }
}

impl OperatorError for AggregatorError {
    fn is_validation(&self) -> bool {
        AggregatorError::is_validation(self)
    }
}
