use async_trait::async_trait;
use bson::Bson;
use std::sync::Mutex;

use super::crud::RecordStore;

/// In-memory collection that records every delete call.
pub struct MemoryStore {
    ids: Mutex<Vec<Bson>>,
    calls: Mutex<Vec<Vec<Bson>>>,
    fail_on_call: Option<usize>,
    scan_limit: Option<usize>,
}

impl MemoryStore {
    pub fn with_records(count: i64) -> Self {
        Self {
            ids: Mutex::new((0..count).map(Bson::Int64).collect()),
            calls: Mutex::new(Vec::new()),
            fail_on_call: None,
            scan_limit: None,
        }
    }

    /// The n-th delete call (1-based) fails with a connection error.
    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// The identifier scan returns at most `limit` ids, as if records
    /// vanished between counting and scanning.
    pub fn scanning_at_most(mut self, limit: usize) -> Self {
        self.scan_limit = Some(limit);
        self
    }

    pub fn stop_failing(&mut self) {
        self.fail_on_call = None;
        self.calls.lock().unwrap().clear();
    }

    pub fn insert(&self, count: i64) {
        let mut ids = self.ids.lock().unwrap();
        let next = ids.len() as i64 + 1_000_000;
        ids.extend((next..next + count).map(Bson::Int64));
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Vec<Bson>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn count(&self) -> Result<u64, mongodb::error::Error> {
        Ok(self.len() as u64)
    }

    async fn find_ids(&self, limit: u64) -> Result<Vec<Bson>, mongodb::error::Error> {
        let limit = self.scan_limit.map_or(limit as usize, |cap| cap.min(limit as usize));
        Ok(self.ids.lock().unwrap().iter().take(limit).cloned().collect())
    }

    async fn delete_ids(&self, ids: &[Bson]) -> Result<u64, mongodb::error::Error> {
        let mut calls = self.calls.lock().unwrap();
        if self.fail_on_call == Some(calls.len() + 1) {
            return Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset").into());
        }
        calls.push(ids.to_vec());

        let mut stored = self.ids.lock().unwrap();
        let before = stored.len();
        stored.retain(|id| !ids.contains(id));
        Ok((before - stored.len()) as u64)
    }
}
