use std::io::{BufRead, Write};
use validator::{Validate, ValidationError};

use crate::config::database;
use crate::config::prompt::{PromptError, Prompter};

/// Everything one deletion run needs. The namespace has no defaults; the
/// operator names the collection being trimmed.
#[derive(Debug, Clone, Validate)]
pub struct DeleterConfig {
    #[validate(custom(function = "validate_connection_string"))]
    pub connection_string: String,
    #[validate(length(min = 1, message = "Database name cannot be empty"))]
    pub db_name: String,
    #[validate(length(min = 1, message = "Collection name cannot be empty"))]
    pub collection_name: String,
    pub preserve_count: u64,
}

impl DeleterConfig {
    pub fn prompt<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Self, PromptError> {
        let connection_string =
            prompter.text_or("MongoDB connection URI", &database::default_uri())?;
        let db_name = prompter.required("Database name")?;
        let collection_name = prompter.required("Collection name")?;
        let preserve_count = prompter.number("Number of documents to preserve")?;

        Ok(Self {
            connection_string,
            db_name,
            collection_name,
            preserve_count,
        })
    }
}

pub fn validate_connection_string(uri: &str) -> Result<(), ValidationError> {
    if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
        Ok(())
    } else {
        let mut error = ValidationError::new("connection_string");
        error.message = Some("Connection URI must start with mongodb:// or mongodb+srv://".into());
        Err(error)
    }
}
