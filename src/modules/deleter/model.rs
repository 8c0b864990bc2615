use bson::Bson;

use super::error::DeleterError;

/// Hard ceiling the server places on identifiers per `delete_many` call.
pub const BATCH_SIZE: usize = 1000;

/// How many documents to remove so that `preserve_count` remain.
///
/// Only built through the validating constructors, so
/// `delete_count == total_count - preserve_count` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionPlan {
    total_count: u64,
    preserve_count: u64,
    delete_count: u64,
}

impl DeletionPlan {
    pub fn new(total_count: u64, preserve_count: u64) -> Result<Self, DeleterError> {
        if preserve_count > total_count {
            return Err(DeleterError::Validation(format!(
                "The number of documents to preserve ({}) is greater than the total number of documents in the collection ({}).",
                preserve_count, total_count
            )));
        }

        Ok(Self {
            total_count,
            preserve_count,
            delete_count: total_count - preserve_count,
        })
    }

    /// Plan for an explicit identifier list of `delete_count` entries.
    pub fn for_ids(total_count: u64, delete_count: u64) -> Result<Self, DeleterError> {
        if delete_count > total_count {
            return Err(DeleterError::Validation(format!(
                "Cannot delete {} documents from a collection holding {}.",
                delete_count, total_count
            )));
        }

        Ok(Self {
            total_count,
            preserve_count: total_count - delete_count,
            delete_count,
        })
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn preserve_count(&self) -> u64 {
        self.preserve_count
    }

    pub fn delete_count(&self) -> u64 {
        self.delete_count
    }

    pub fn batch_count(&self, batch_size: usize) -> usize {
        (self.delete_count as usize).div_ceil(batch_size)
    }
}

/// Emitted after every `delete_many` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based.
    pub batch: usize,
    pub batches: usize,
    pub batch_size: usize,
    pub deleted_in_batch: u64,
    pub deleted_total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub plan: DeletionPlan,
    /// Server-reported deletions, one entry per call.
    pub batches: Vec<u64>,
    pub deleted_count: u64,
}

impl DeletionReport {
    pub fn preserved_count(&self) -> u64 {
        self.plan.total_count().saturating_sub(self.deleted_count)
    }
}

/// Splits `ids` into consecutive chunks of at most `batch_size`, keeping order.
pub fn partition(ids: &[Bson], batch_size: usize) -> std::slice::Chunks<'_, Bson> {
    ids.chunks(batch_size)
}
