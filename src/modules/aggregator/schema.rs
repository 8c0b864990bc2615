use std::io::{BufRead, Write};
use validator::{Validate, ValidationError};

use crate::config::database;
use crate::config::prompt::{PromptError, Prompter};
use crate::modules::deleter::schema::validate_connection_string;

/// Canned source/target pairs for the two flattening jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// `haac.user-hgus` into `datasets.stations_catalogue`, indexed.
    StationsCatalogue,
    /// `datasets.user_hgus_10` into `devices.devices`.
    DeviceExtract,
}

impl Preset {
    pub fn defaults(self) -> AggregatorConfig {
        let (db_name, collection_name, new_db_name, new_collection_name, create_index) = match self {
            Preset::StationsCatalogue => ("haac", "user-hgus", "datasets", "stations_catalogue", true),
            Preset::DeviceExtract => ("datasets", "user_hgus_10", "devices", "devices", false),
        };

        AggregatorConfig {
            connection_string: database::default_uri(),
            db_name: db_name.to_string(),
            collection_name: collection_name.to_string(),
            new_db_name: new_db_name.to_string(),
            new_collection_name: new_collection_name.to_string(),
            create_index,
        }
    }
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_distinct_namespaces"))]
pub struct AggregatorConfig {
    #[validate(custom(function = "validate_connection_string"))]
    pub connection_string: String,
    #[validate(length(min = 1, message = "Source database name cannot be empty"))]
    pub db_name: String,
    #[validate(length(min = 1, message = "Source collection name cannot be empty"))]
    pub collection_name: String,
    #[validate(length(min = 1, message = "Target database name cannot be empty"))]
    pub new_db_name: String,
    #[validate(length(min = 1, message = "Target collection name cannot be empty"))]
    pub new_collection_name: String,
    pub create_index: bool,
}

impl AggregatorConfig {
    /// Every prompt shows the preset value and falls back to it on empty input.
    pub fn prompt<R: BufRead, W: Write>(
        preset: Preset,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Self, PromptError> {
        let defaults = preset.defaults();

        Ok(Self {
            connection_string: prompter.text_or("Enter connection URI", &defaults.connection_string)?,
            db_name: prompter.text_or("Enter the source database name", &defaults.db_name)?,
            collection_name: prompter.text_or("Enter the source collection name", &defaults.collection_name)?,
            new_db_name: prompter.text_or("Enter the target database name", &defaults.new_db_name)?,
            new_collection_name: prompter
                .text_or("Enter the target collection name", &defaults.new_collection_name)?,
            create_index: defaults.create_index,
        })
    }
}

fn validate_distinct_namespaces(config: &AggregatorConfig) -> Result<(), ValidationError> {
    if config.db_name == config.new_db_name && config.collection_name == config.new_collection_name {
        let mut error = ValidationError::new("namespace");
        error.message = Some("Source and target collections must differ".into());
        return Err(error);
    }
    Ok(())
}
