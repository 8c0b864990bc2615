use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

/// The three engine primitives the batch deleter needs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn count(&self) -> Result<u64, mongodb::error::Error>;

    /// First `limit` identifiers in the engine's natural order.
    async fn find_ids(&self, limit: u64) -> Result<Vec<Bson>, mongodb::error::Error>;

    /// Returns what the server reports as deleted.
    async fn delete_ids(&self, ids: &[Bson]) -> Result<u64, mongodb::error::Error>;
}

pub struct DeleterCrud {
    collection: Collection<Document>,
}

impl DeleterCrud {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

#[async_trait]
impl RecordStore for DeleterCrud {
    async fn count(&self) -> Result<u64, mongodb::error::Error> {
        self.collection.count_documents(doc! {}).await
    }

    async fn find_ids(&self, limit: u64) -> Result<Vec<Bson>, mongodb::error::Error> {
        // A limit of zero means "no limit" to the server.
        if limit == 0 {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection
            .find(doc! {})
            .projection(doc! { "_id": 1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;

        let documents: Vec<Document> = cursor.try_collect().await?;

        Ok(documents
            .into_iter()
            .filter_map(|mut document| document.remove("_id"))
            .collect())
    }

    async fn delete_ids(&self, ids: &[Bson]) -> Result<u64, mongodb::error::Error> {
        let result = self
            .collection
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}
