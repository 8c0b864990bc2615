use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use super::error::AggregatorError;
use super::pipeline::{self, FieldSynthesizer};

pub struct AggregatorCrud {
    source: Collection<Document>,
    target: Collection<Document>,
}

impl AggregatorCrud {
    pub fn new(source_db: &Database, source_collection: &str, target_db: &Database, target_collection: &str) -> Self {
        Self {
            source: source_db.collection(source_collection),
            target: target_db.collection(target_collection),
        }
    }

    pub fn target_collection(&self) -> String {
        self.target.name().to_string()
    }

    /// Devices across every HGU of every user. An empty source counts as 0.
    pub async fn count_devices(&self) -> Result<u64, AggregatorError> {
        let mut cursor = self.source.aggregate(pipeline::count_devices_pipeline()).await?;

        match cursor.try_next().await? {
            Some(result) => match result.get("devices") {
                Some(Bson::Int32(n)) if *n >= 0 => Ok(*n as u64),
                Some(Bson::Int64(n)) if *n >= 0 => Ok(*n as u64),
                other => Err(AggregatorError::InvalidCount(format!("{:?}", other))),
            },
            None => Ok(0),
        }
    }

    /// Runs the station pipeline; the trailing `$merge` writes into the
    /// target collection server-side.
    pub async fn aggregate_and_merge(&self, synthesizer: &dyn FieldSynthesizer) -> Result<(), AggregatorError> {
        let namespace = self.target.namespace();
        let stages = pipeline::station_pipeline(synthesizer, &namespace.db, &namespace.coll);

        tracing::debug!(stages = stages.len(), target = %namespace, "submitting station pipeline");

        let cursor = self.source.aggregate(stages).await?;
        let _: Vec<Document> = cursor.try_collect().await?;
        Ok(())
    }

    /// Compound, non-unique; a no-op when an identical index exists.
    pub async fn create_index(&self) -> Result<String, AggregatorError> {
        let model = IndexModel::builder()
            .keys(doc! { "USER_4P_ID": 1, "PHONE_WITH_PREFIX_ID": 1 })
            .options(IndexOptions::builder().unique(false).build())
            .build();

        let result = self.target.create_index(model).await?;
        Ok(result.index_name)
    }

    pub async fn count_target(&self) -> Result<u64, AggregatorError> {
        Ok(self.target.count_documents(doc! {}).await?)
    }
}
