//! Supervised analysis worker pool
//!
//! Jobs travel over a bounded mpsc queue to a fixed set of workers sharing the
//! receiver. Each attempt runs in its own task under a timeout, so a panic
//! surfaces as a failed attempt. Failed attempts are retried up to
//! `max_attempts` and the terminal outcome is written to the store.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use solarscan_common::config::PipelineConfig;
use solarscan_common::events::{AnalysisEvent, PipelineStage};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::store::RequestStore;
use crate::error::AnalysisError;
use crate::models::{AnalysisJob, AnalysisResult};
use crate::services::{AnalysisOrchestrator, PipelineSink};

/// Worker pool tuning
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub job_timeout: Duration,
    pub max_attempts: u32,
}

impl From<&PipelineConfig> for WorkerSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            worker_count: config.worker_count.max(1),
            queue_capacity: config.queue_capacity.max(1),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

/// Shared state every worker runs against
struct WorkerContext {
    orchestrator: Arc<AnalysisOrchestrator>,
    store: Arc<dyn RequestStore>,
    job_timeout: Duration,
    max_attempts: u32,
    depth: Arc<AtomicUsize>,
}

pub struct WorkerPool {
    sender: Mutex<Option<mpsc::Sender<AnalysisJob>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    depth: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Spawn the workers; must be called inside a tokio runtime
    pub fn start(
        settings: WorkerSettings,
        orchestrator: Arc<AnalysisOrchestrator>,
        store: Arc<dyn RequestStore>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(settings.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));
        let depth = Arc::new(AtomicUsize::new(0));

        let context = Arc::new(WorkerContext {
            orchestrator,
            store,
            job_timeout: settings.job_timeout,
            max_attempts: settings.max_attempts,
            depth: Arc::clone(&depth),
        });

        let handles: Vec<JoinHandle<()>> = (0..settings.worker_count)
            .map(|worker_id| tokio::spawn(run_worker(worker_id, Arc::clone(&rx), Arc::clone(&context))))
            .collect();

        tracing::info!(
            workers = settings.worker_count,
            queue_capacity = settings.queue_capacity,
            job_timeout_secs = settings.job_timeout.as_secs(),
            max_attempts = settings.max_attempts,
            "Analysis worker pool started"
        );

        Self {
            sender: Mutex::new(Some(tx)),
            handles: Mutex::new(handles),
            depth,
        }
    }

    /// Queue a job without waiting for capacity
    pub async fn enqueue(&self, job: AnalysisJob) -> Result<(), AnalysisError> {
        let sender = self.sender.lock().await;
        let Some(tx) = sender.as_ref() else {
            return Err(AnalysisError::QueueFull);
        };

        // Count before sending so a fast worker never decrements below zero
        self.depth.fetch_add(1, Ordering::SeqCst);
        match tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.depth.fetch_sub(1, Ordering::SeqCst);
                let closed = matches!(e, mpsc::error::TrySendError::Closed(_));
                tracing::warn!(closed, "Analysis queue rejected job");
                Err(AnalysisError::QueueFull)
            }
        }
    }

    /// Jobs queued and not yet picked up by a worker
    pub fn queue_depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Stop accepting jobs, drain the queue and wait for the workers
    pub async fn shutdown(&self) {
        self.sender.lock().await.take();

        let handles: Vec<JoinHandle<()>> = self.handles.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Analysis worker terminated abnormally");
            }
        }
        tracing::info!("Analysis worker pool stopped");
    }
}

async fn run_worker(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<AnalysisJob>>>,
    context: Arc<WorkerContext>,
) {
    loop {
        let job = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };
        let Some(job) = job else {
            break;
        };
        context.depth.fetch_sub(1, Ordering::SeqCst);

        tracing::debug!(worker_id, request_id = %job.request_id, "Worker picked up job");
        context.process(job).await;
    }
    tracing::debug!(worker_id, "Worker exiting");
}

impl WorkerContext {
    async fn process(&self, job: AnalysisJob) {
        let request_id = job.request_id;
        let sink = Arc::new(StoreSink {
            store: Arc::clone(&self.store),
        });

        let mut failure = String::new();
        let mut failed_stage = PipelineStage::Accepted;

        for _ in 0..self.max_attempts {
            let attempt = match self.store.record_attempt(request_id).await {
                Ok(attempt) => attempt,
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Dropping job without a live record");
                    return;
                }
            };

            // Each attempt gets its own task so a panicking stage cannot take the worker down
            let orchestrator = Arc::clone(&self.orchestrator);
            let attempt_job = job.clone();
            let attempt_sink = Arc::clone(&sink);
            let mut handle = tokio::spawn(async move {
                orchestrator.execute(&attempt_job, attempt_sink.as_ref()).await
            });

            let outcome = tokio::time::timeout(self.job_timeout, &mut handle).await;
            match outcome {
                Ok(Ok(Ok(_))) => return,
                Ok(Ok(Err(e))) => {
                    failed_stage = match &e {
                        AnalysisError::Pipeline { stage, .. } => *stage,
                        _ => PipelineStage::Persisting,
                    };
                    failure = e.to_string();
                }
                Ok(Err(join_error)) => {
                    failed_stage = self.current_stage(request_id).await;
                    failure = if join_error.is_panic() {
                        format!(
                            "Analysis panicked during {:?}: {}",
                            failed_stage,
                            panic_message(join_error.into_panic())
                        )
                    } else {
                        format!("Analysis cancelled during {:?}", failed_stage)
                    };
                }
                Err(_) => {
                    handle.abort();
                    failed_stage = self.current_stage(request_id).await;
                    failure = format!(
                        "Analysis timed out after {}s during {:?}",
                        self.job_timeout.as_secs(),
                        failed_stage
                    );
                }
            }

            tracing::warn!(
                request_id = %request_id,
                attempt,
                max_attempts = self.max_attempts,
                stage = ?failed_stage,
                error = %failure,
                "Analysis attempt failed"
            );
        }

        if let Err(e) = self.store.fail(request_id, failure.clone()).await {
            tracing::warn!(request_id = %request_id, error = %e, "Could not record failure");
            return;
        }

        tracing::error!(
            request_id = %request_id,
            stage = ?failed_stage,
            error = %failure,
            "Analysis failed"
        );
        self.orchestrator.event_bus().emit_lossy(AnalysisEvent::Failed {
            request_id,
            stage: failed_stage,
            error: failure,
            timestamp: Utc::now(),
        });
    }

    /// Last stage the pipeline reported for the request
    async fn current_stage(&self, request_id: Uuid) -> PipelineStage {
        self.store
            .get(request_id)
            .await
            .map(|record| record.stage)
            .unwrap_or(PipelineStage::Accepted)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Reports pipeline progress into the request store
struct StoreSink {
    store: Arc<dyn RequestStore>,
}

#[async_trait]
impl PipelineSink for StoreSink {
    async fn stage_changed(&self, request_id: Uuid, stage: PipelineStage) {
        if let Err(e) = self.store.update_stage(request_id, stage).await {
            tracing::debug!(request_id = %request_id, error = %e, "Stage update ignored");
        }
    }

    async fn persist(&self, result: &AnalysisResult) -> Result<(), AnalysisError> {
        self.store
            .complete(result.clone())
            .await
            .map_err(|e| AnalysisError::Internal(e.to_string()))
    }
}
