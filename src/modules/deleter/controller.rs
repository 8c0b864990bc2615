use bson::Bson;
use std::collections::HashSet;

use super::crud::RecordStore;
use super::error::DeleterError;
use super::model::{partition, BatchProgress, DeletionPlan, DeletionReport, BATCH_SIZE};

/// Removes a surplus of documents from one collection, never handing the
/// server more than `batch_size` identifiers per delete call.
///
/// Runs strictly one call at a time. A failure part-way through leaves the
/// earlier batches deleted: re-running with the same preserve count simply
/// plans a smaller surplus against the new live count.
pub struct BatchDeleter<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    batch_size: usize,
}

impl<'a, S: RecordStore + ?Sized> BatchDeleter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            batch_size: BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, DeleterError> {
        if batch_size == 0 || batch_size > BATCH_SIZE {
            return Err(DeleterError::Validation(format!(
                "Batch size must be between 1 and {}, got {}.",
                BATCH_SIZE, batch_size
            )));
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    /// Counts the collection now and checks `preserve_count` against it.
    pub async fn plan(&self, preserve_count: u64) -> Result<DeletionPlan, DeleterError> {
        let total_count = self.store.count().await?;
        let plan = DeletionPlan::new(total_count, preserve_count)?;

        tracing::info!(
            total = plan.total_count(),
            preserve = plan.preserve_count(),
            delete = plan.delete_count(),
            batches = plan.batch_count(self.batch_size),
            "deletion planned"
        );

        Ok(plan)
    }

    /// Deletes the surplus of an earlier plan. The collection is counted
    /// again first; a plan whose total no longer matches is rejected before
    /// anything is deleted.
    pub async fn execute<F>(
        &self,
        plan: &DeletionPlan,
        on_batch: F,
    ) -> Result<DeletionReport, DeleterError>
    where
        F: FnMut(&BatchProgress),
    {
        let live_count = self.store.count().await?;
        if live_count != plan.total_count() {
            return Err(DeleterError::Validation(format!(
                "The collection changed since planning ({} documents planned, {} now); plan again.",
                plan.total_count(),
                live_count
            )));
        }

        self.execute_fresh(*plan, on_batch).await
    }

    /// Plans and executes in one go.
    pub async fn preserve<F>(
        &self,
        preserve_count: u64,
        on_batch: F,
    ) -> Result<DeletionReport, DeleterError>
    where
        F: FnMut(&BatchProgress),
    {
        let plan = self.plan(preserve_count).await?;
        self.execute_fresh(plan, on_batch).await
    }

    /// Deletes a caller-supplied identifier list. Repeated identifiers are
    /// dropped, and what remains may not outnumber the collection.
    pub async fn delete_ids<F>(&self, ids: &[Bson], on_batch: F) -> Result<DeletionReport, DeleterError>
    where
        F: FnMut(&BatchProgress),
    {
        let ids = unique_ids(ids);
        let total_count = self.store.count().await?;
        let plan = DeletionPlan::for_ids(total_count, ids.len() as u64)?;

        self.delete_in_batches(plan, &ids, on_batch).await
    }

    /// `plan` was counted against the store moments ago.
    async fn execute_fresh<F>(&self, plan: DeletionPlan, on_batch: F) -> Result<DeletionReport, DeleterError>
    where
        F: FnMut(&BatchProgress),
    {
        let mut ids = self.store.find_ids(plan.delete_count()).await?;
        ids.truncate(plan.delete_count() as usize);

        if (ids.len() as u64) < plan.delete_count() {
            return Err(DeleterError::Validation(format!(
                "Only {} of the {} documents to delete were found; the collection shrank, plan again.",
                ids.len(),
                plan.delete_count()
            )));
        }

        self.delete_in_batches(plan, &ids, on_batch).await
    }

    async fn delete_in_batches<F>(
        &self,
        plan: DeletionPlan,
        ids: &[Bson],
        mut on_batch: F,
    ) -> Result<DeletionReport, DeleterError>
    where
        F: FnMut(&BatchProgress),
    {
        let batches = ids.len().div_ceil(self.batch_size);
        let mut report = DeletionReport {
            plan,
            batches: Vec::with_capacity(batches),
            deleted_count: 0,
        };

        for (index, chunk) in partition(ids, self.batch_size).enumerate() {
            let deleted = self
                .store
                .delete_ids(chunk)
                .await
                .map_err(|source| DeleterError::BatchFailed {
                    batch: index + 1,
                    batches,
                    deleted: report.deleted_count,
                    source,
                })?;

            if deleted != chunk.len() as u64 {
                tracing::warn!(requested = chunk.len(), deleted, "batch deleted fewer documents than requested");
            }

            report.batches.push(deleted);
            report.deleted_count += deleted;

            tracing::debug!(batch = index + 1, batches, deleted, total = report.deleted_count, "batch deleted");

            on_batch(&BatchProgress {
                batch: index + 1,
                batches,
                batch_size: chunk.len(),
                deleted_in_batch: deleted,
                deleted_total: report.deleted_count,
            });
        }

        Ok(report)
    }
}

/// First occurrence wins. `Bson` has no `Hash`, so ids are keyed on their
/// rendering.
fn unique_ids(ids: &[Bson]) -> Vec<Bson> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().filter(|id| seen.insert(id.to_string())).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::deleter::testing::MemoryStore;

    #[tokio::test]
    async fn small_surplus_is_a_single_batch() {
        let store = MemoryStore::with_records(2500);
        let report = BatchDeleter::new(&store).preserve(2000, |_| {}).await.unwrap();

        assert_eq!(report.plan.delete_count(), 500);
        assert_eq!(report.batches, vec![500]);
        assert_eq!(report.preserved_count(), 2000);
        assert_eq!(store.len(), 2000);
    }

    #[tokio::test]
    async fn large_surplus_is_split_at_the_ceiling() {
        let store = MemoryStore::with_records(2500);
        let report = BatchDeleter::new(&store).preserve(100, |_| {}).await.unwrap();

        assert_eq!(report.batches, vec![1000, 1000, 400]);
        assert_eq!(report.deleted_count, 2400);
        assert_eq!(store.len(), 100);

        let sizes: Vec<usize> = store.calls().iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![1000, 1000, 400]);
    }

    #[tokio::test]
    async fn preserving_more_than_total_changes_nothing() {
        let store = MemoryStore::with_records(10);
        let err = BatchDeleter::new(&store).preserve(20, |_| {}).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.len(), 10);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn nothing_to_delete_issues_no_calls() {
        let store = MemoryStore::with_records(10);
        let report = BatchDeleter::new(&store).preserve(10, |_| {}).await.unwrap();

        assert_eq!(report.deleted_count, 0);
        assert!(report.batches.is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn chunks_reproduce_the_enumeration_order() {
        let store = MemoryStore::with_records(2345);
        let expected: Vec<Bson> = (0..2345).map(Bson::Int64).collect();

        BatchDeleter::new(&store).preserve(0, |_| {}).await.unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls.concat(), expected);
    }

    #[tokio::test]
    async fn progress_is_reported_after_every_batch() {
        let store = MemoryStore::with_records(25);
        let mut seen = Vec::new();

        BatchDeleter::new(&store)
            .with_batch_size(10)
            .unwrap()
            .preserve(3, |progress| seen.push(*progress))
            .await
            .unwrap();

        let totals: Vec<u64> = seen.iter().map(|p| p.deleted_total).collect();
        assert_eq!(totals, vec![10, 20, 22]);
        assert!(seen.iter().all(|p| p.batches == 3));
        assert_eq!(seen.last().unwrap().batch_size, 2);
    }

    #[tokio::test]
    async fn failure_mid_loop_keeps_earlier_batches() {
        let store = MemoryStore::with_records(30).failing_on(2);
        let err = BatchDeleter::new(&store)
            .with_batch_size(10)
            .unwrap()
            .preserve(0, |_| {})
            .await
            .unwrap_err();

        match err {
            DeleterError::BatchFailed { batch, batches, deleted, .. } => {
                assert_eq!((batch, batches, deleted), (2, 3, 10));
            }
            other => panic!("expected BatchFailed, got {:?}", other),
        }
        assert_eq!(store.len(), 20);
    }

    #[tokio::test]
    async fn rerunning_converges_on_the_preserve_count() {
        let mut store = MemoryStore::with_records(30).failing_on(2);

        {
            let deleter = BatchDeleter::new(&store).with_batch_size(10).unwrap();
            assert!(deleter.preserve(5, |_| {}).await.is_err());
        }
        assert_eq!(store.len(), 20);

        store.stop_failing();
        let deleter = BatchDeleter::new(&store).with_batch_size(10).unwrap();
        let report = deleter.preserve(5, |_| {}).await.unwrap();

        assert_eq!(report.plan.total_count(), 20);
        assert_eq!(report.deleted_count, 15);
        assert_eq!(store.len(), 5);

        let again = deleter.preserve(5, |_| {}).await.unwrap();
        assert_eq!(again.deleted_count, 0);
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn execute_rejects_a_plan_for_a_larger_collection() {
        let store = MemoryStore::with_records(5);
        let plan = DeletionPlan::new(100, 3).unwrap();

        let err = BatchDeleter::new(&store).execute(&plan, |_| {}).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.len(), 5);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn execute_rejects_a_plan_after_the_collection_grew() {
        let store = MemoryStore::with_records(10);
        let deleter = BatchDeleter::new(&store);
        let plan = deleter.plan(4).await.unwrap();

        store.insert(5);
        let err = deleter.execute(&plan, |_| {}).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.len(), 15);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn execute_reports_the_planned_counts_when_unchanged() {
        let store = MemoryStore::with_records(12);
        let deleter = BatchDeleter::new(&store);
        let plan = deleter.plan(2).await.unwrap();

        let report = deleter.execute(&plan, |_| {}).await.unwrap();

        assert_eq!(report.deleted_count, 10);
        assert_eq!(report.preserved_count(), 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn short_identifier_scan_deletes_nothing() {
        let store = MemoryStore::with_records(10).scanning_at_most(4);

        let err = BatchDeleter::new(&store).preserve(2, |_| {}).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.len(), 10);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn supplied_ids_are_validated_against_live_count() {
        let store = MemoryStore::with_records(3);
        let ids: Vec<Bson> = (0..4).map(Bson::Int64).collect();

        let err = BatchDeleter::new(&store).delete_ids(&ids, |_| {}).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn supplied_ids_are_deleted() {
        let store = MemoryStore::with_records(5);
        let ids = vec![Bson::Int64(1), Bson::Int64(3)];

        let report = BatchDeleter::new(&store).delete_ids(&ids, |_| {}).await.unwrap();
        assert_eq!(report.deleted_count, 2);
        assert_eq!(report.preserved_count(), 3);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn repeated_supplied_ids_count_once() {
        let store = MemoryStore::with_records(3);
        let ids = vec![Bson::Int64(1), Bson::Int64(1), Bson::Int64(1)];

        let report = BatchDeleter::new(&store).delete_ids(&ids, |_| {}).await.unwrap();

        assert_eq!(report.plan.delete_count(), 1);
        assert_eq!(report.plan.preserve_count(), 2);
        assert_eq!(report.preserved_count(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.calls(), vec![vec![Bson::Int64(1)]]);
    }

    #[test]
    fn unique_ids_keeps_first_occurrence_order() {
        let ids = vec![
            Bson::Int64(2),
            Bson::String("a".to_string()),
            Bson::Int64(2),
            Bson::String("2".to_string()),
        ];
        assert_eq!(
            unique_ids(&ids),
            vec![Bson::Int64(2), Bson::String("a".to_string()), Bson::String("2".to_string())]
        );
    }

    #[test]
    fn batch_size_outside_the_ceiling_is_rejected() {
        let store = MemoryStore::with_records(1);
        assert!(BatchDeleter::new(&store).with_batch_size(0).is_err());
        assert!(BatchDeleter::new(&store).with_batch_size(BATCH_SIZE + 1).is_err());
    }
}
