//! Request lifecycle manager
//!
//! Accepts submissions, schedules them on the worker pool and answers status
//! polls from the request store.

pub mod store;
pub mod worker_pool;

pub use store::{InMemoryRequestStore, RequestStore, StoreError};
pub use worker_pool::{WorkerPool, WorkerSettings};

use std::sync::Arc;

use chrono::Utc;
use solarscan_common::config::{ServiceAreaConfig, ServiceConfig, UnknownRequestPolicy};
use solarscan_common::events::AnalysisEvent;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::models::{
    AnalysisJob, AnalysisRecord, AnalysisRequest, AnalysisStatus, StatusView, SubmitReceipt,
};
use crate::services::AnalysisOrchestrator;

pub struct RequestLifecycleManager {
    orchestrator: Arc<AnalysisOrchestrator>,
    store: Arc<dyn RequestStore>,
    pool: WorkerPool,
    service_area: ServiceAreaConfig,
    unknown_request_policy: UnknownRequestPolicy,
    estimated_time_seconds: u64,
}

impl RequestLifecycleManager {
    /// Manager backed by an in-memory store; spawns the worker pool
    pub fn new(config: &ServiceConfig, orchestrator: Arc<AnalysisOrchestrator>) -> Self {
        Self::with_store(config, orchestrator, Arc::new(InMemoryRequestStore::new()))
    }

    pub fn with_store(
        config: &ServiceConfig,
        orchestrator: Arc<AnalysisOrchestrator>,
        store: Arc<dyn RequestStore>,
    ) -> Self {
        let pool = WorkerPool::start(
            WorkerSettings::from(&config.pipeline),
            Arc::clone(&orchestrator),
            Arc::clone(&store),
        );
        Self {
            orchestrator,
            store,
            pool,
            service_area: config.service_area.clone(),
            unknown_request_policy: config.pipeline.unknown_request_policy,
            estimated_time_seconds: config.pipeline.estimated_time_seconds,
        }
    }

    /// Validate, geocode and schedule a request
    ///
    /// Nothing is scheduled unless the address resolves inside the service
    /// area. Returns as soon as the job is queued.
    pub async fn submit(&self, request: AnalysisRequest) -> Result<SubmitReceipt, AnalysisError> {
        request.validate()?;

        let location = self.orchestrator.resolve_location(&request.address).await?;
        if !self.service_area.contains(&location.region) {
            tracing::info!(
                address = %request.address,
                region = %location.region,
                "Rejected address outside service area"
            );
            return Err(AnalysisError::UnsupportedRegion(location.region));
        }

        let request_id = Uuid::new_v4();
        let created_at = Utc::now();
        let address = request.address.clone();

        self.store
            .insert(AnalysisRecord::new(request_id, request.clone(), created_at))
            .await
            .map_err(|e| AnalysisError::Internal(e.to_string()))?;

        let job = AnalysisJob {
            request_id,
            request,
            location,
            created_at,
        };
        if let Err(e) = self.pool.enqueue(job).await {
            self.store.remove(request_id).await;
            return Err(e);
        }

        self.orchestrator.event_bus().emit_lossy(AnalysisEvent::Accepted {
            request_id,
            address: address.clone(),
            timestamp: created_at,
        });
        tracing::info!(request_id = %request_id, address = %address, "Analysis request accepted");

        Ok(SubmitReceipt {
            request_id,
            status: AnalysisStatus::Processing,
            message: format!(
                "Analysis started. Results will be available in about {} seconds.",
                self.estimated_time_seconds
            ),
            estimated_time_seconds: self.estimated_time_seconds,
        })
    }

    pub async fn get_status(&self, request_id: Uuid) -> Result<StatusView, AnalysisError> {
        match self.store.get(request_id).await {
            Some(record) => Ok(record.status_view()),
            None => match self.unknown_request_policy {
                UnknownRequestPolicy::NotFound => Err(AnalysisError::NotFound(request_id)),
                UnknownRequestPolicy::ProcessingStub => Ok(StatusView::placeholder(request_id)),
            },
        }
    }

    pub fn queue_depth(&self) -> usize {
        self.pool.queue_depth()
    }

    /// Drain queued jobs and stop the workers
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }
}
