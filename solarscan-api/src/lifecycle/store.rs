//! Request record store
//!
//! One record per request id. The submitting call inserts it, the owning
//! worker advances it, and terminal records are never rewritten.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use solarscan_common::events::PipelineStage;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AnalysisRecord, AnalysisResult};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("request already exists: {0}")]
    Duplicate(Uuid),

    #[error("request not found: {0}")]
    NotFound(Uuid),

    #[error("request already finished: {0}")]
    AlreadyTerminal(Uuid),
}

/// Identifier → record mapping shared by submitters and workers
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), StoreError>;

    async fn get(&self, request_id: Uuid) -> Option<AnalysisRecord>;

    /// Advisory progress; rejected once the record is terminal
    async fn update_stage(&self, request_id: Uuid, stage: PipelineStage) -> Result<(), StoreError>;

    /// Count a new attempt, returning the attempt number
    async fn record_attempt(&self, request_id: Uuid) -> Result<u32, StoreError>;

    async fn complete(&self, result: AnalysisResult) -> Result<(), StoreError>;

    async fn fail(&self, request_id: Uuid, error: String) -> Result<(), StoreError>;

    /// Drop a record that was never scheduled
    async fn remove(&self, request_id: Uuid) -> Option<AnalysisRecord>;

    async fn count(&self) -> usize;
}

/// Process-local store; records are lost on restart
#[derive(Clone, Default)]
pub struct InMemoryRequestStore {
    records: Arc<RwLock<HashMap<Uuid, AnalysisRecord>>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.request_id) {
            return Err(StoreError::Duplicate(record.request_id));
        }
        records.insert(record.request_id, record);
        Ok(())
    }

    async fn get(&self, request_id: Uuid) -> Option<AnalysisRecord> {
        self.records.read().await.get(&request_id).cloned()
    }

    async fn update_stage(&self, request_id: Uuid, stage: PipelineStage) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&request_id)
            .ok_or(StoreError::NotFound(request_id))?;
        if record.is_terminal() {
            return Err(StoreError::AlreadyTerminal(request_id));
        }
        record.stage = stage;
        Ok(())
    }

    async fn record_attempt(&self, request_id: Uuid) -> Result<u32, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&request_id)
            .ok_or(StoreError::NotFound(request_id))?;
        if record.is_terminal() {
            return Err(StoreError::AlreadyTerminal(request_id));
        }
        record.attempts += 1;
        record.stage = PipelineStage::Accepted;
        Ok(record.attempts)
    }

    async fn complete(&self, result: AnalysisResult) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&result.request_id)
            .ok_or(StoreError::NotFound(result.request_id))?;
        if record.is_terminal() {
            return Err(StoreError::AlreadyTerminal(result.request_id));
        }
        record.mark_completed(result);
        Ok(())
    }

    async fn fail(&self, request_id: Uuid, error: String) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&request_id)
            .ok_or(StoreError::NotFound(request_id))?;
        if record.is_terminal() {
            return Err(StoreError::AlreadyTerminal(request_id));
        }
        record.mark_failed(error);
        Ok(())
    }

    async fn remove(&self, request_id: Uuid) -> Option<AnalysisRecord> {
        self.records.write().await.remove(&request_id)
    }

    async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisRequest, AnalysisStatus};
    use chrono::Utc;

    fn record() -> AnalysisRecord {
        AnalysisRecord::new(Uuid::new_v4(), AnalysisRequest::new("경기도 수원시"), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = InMemoryRequestStore::new();
        let record = record();
        let id = record.request_id;

        store.insert(record.clone()).await.unwrap();
        assert_eq!(store.insert(record).await, Err(StoreError::Duplicate(id)));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_terminal_record_is_not_rewritten() {
        let store = InMemoryRequestStore::new();
        let record = record();
        let id = record.request_id;
        store.insert(record).await.unwrap();

        assert_eq!(store.record_attempt(id).await, Ok(1));
        store.update_stage(id, PipelineStage::Prediction).await.unwrap();
        store.fail(id, "model unavailable".to_string()).await.unwrap();

        assert_eq!(
            store.update_stage(id, PipelineStage::Economics).await,
            Err(StoreError::AlreadyTerminal(id))
        );
        assert_eq!(
            store.fail(id, "again".to_string()).await,
            Err(StoreError::AlreadyTerminal(id))
        );

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status, AnalysisStatus::Failed);
        assert_eq!(stored.stage, PipelineStage::Failed);
        assert_eq!(stored.failure.as_deref(), Some("model unavailable"));
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let store = InMemoryRequestStore::new();
        let id = Uuid::new_v4();
        assert!(store.get(id).await.is_none());
        assert_eq!(store.record_attempt(id).await, Err(StoreError::NotFound(id)));
        assert!(store.remove(id).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let store = InMemoryRequestStore::new();
        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.insert(record()).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.count().await, 32);
    }
}
