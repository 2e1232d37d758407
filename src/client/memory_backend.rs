//! In-memory backend for mock mode and tests
//!
//! Stands in for the REST backend when none is configured. It is constructed
//! explicitly and injected like any other backend; there is no shared global
//! store. New records get a locally generated timestamp key.

use crate::dates::now_ms;
use crate::error::{JourneyError, Result};
use crate::traits::{CollectionBackend, JourneyRecord};
use crate::view::FilterParams;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

pub struct MemoryBackend<R: JourneyRecord> {
    records: RwLock<Vec<R>>,
    /// Disambiguates keys generated within the same millisecond
    counter: AtomicU64,
}

impl<R: JourneyRecord> Default for MemoryBackend<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: JourneyRecord> MemoryBackend<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seed the store (demo data)
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            counter: AtomicU64::new(0),
        }
    }

    /// Copy of everything stored, in insertion order
    pub async fn snapshot(&self) -> Vec<R> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("local-{}-{}", now_ms(), n)
    }
}

#[async_trait]
impl<R: JourneyRecord> CollectionBackend<R> for MemoryBackend<R> {
    async fn list(&self, filters: &FilterParams) -> Result<Vec<R>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| filters.matches(*r))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let record = R::from_draft(self.next_id(), draft.clone());
        debug!(collection = R::collection(), id = record.record_id(), "Created local record");
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.record_id() == id)
            .ok_or_else(|| JourneyError::NotFound(id.to_string()))?;
        *slot = R::from_draft(id.to_string(), draft.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        if records.len() == before {
            return Err(JourneyError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
