//! Request lifecycle records and the views returned to pollers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solarscan_common::events::PipelineStage;
use uuid::Uuid;

use super::{AnalysisRequest, AnalysisResult, AnalysisStatus, LocationInfo};

/// Lifecycle manager's entry for one request id
///
/// `status` leaves `Processing` exactly once. `stage` is advisory progress,
/// written only by the worker that owns the request.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub request_id: Uuid,
    pub request: AnalysisRequest,
    pub status: AnalysisStatus,
    pub stage: PipelineStage,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<AnalysisResult>,
    pub failure: Option<String>,
    /// Attempts started so far
    pub attempts: u32,
}

impl AnalysisRecord {
    pub fn new(request_id: Uuid, request: AnalysisRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            request_id,
            request,
            status: AnalysisStatus::Processing,
            stage: PipelineStage::Accepted,
            created_at,
            completed_at: None,
            result: None,
            failure: None,
            attempts: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Store the finished result (caller checks `is_terminal` first)
    pub fn mark_completed(&mut self, result: AnalysisResult) {
        self.status = AnalysisStatus::Completed;
        self.stage = PipelineStage::Completed;
        self.completed_at = Some(result.completed_at);
        self.result = Some(result);
    }

    /// Record a failure; no payload is kept
    pub fn mark_failed(&mut self, error: String) {
        self.status = AnalysisStatus::Failed;
        self.stage = PipelineStage::Failed;
        self.completed_at = Some(Utc::now());
        self.result = None;
        self.failure = Some(error);
    }

    /// Snapshot for GET /api/v1/analysis/{id}
    pub fn status_view(&self) -> StatusView {
        match (&self.status, &self.result) {
            (AnalysisStatus::Completed, Some(result)) => StatusView::Completed(Box::new(result.clone())),
            (AnalysisStatus::Failed, _) | (AnalysisStatus::Completed, None) => StatusView::Failed {
                request_id: self.request_id,
                status: AnalysisStatus::Failed,
                error: self
                    .failure
                    .clone()
                    .unwrap_or_else(|| "Analysis failed".to_string()),
                completed_at: self.completed_at,
            },
            (AnalysisStatus::Processing, _) => StatusView::Processing {
                request_id: self.request_id,
                status: AnalysisStatus::Processing,
                progress: self.stage.progress_percent(),
                stage: Some(self.stage),
                message: PROCESSING_MESSAGE.to_string(),
            },
        }
    }
}

const PROCESSING_MESSAGE: &str = "Analysis is in progress.";

/// Progress reported by the legacy placeholder for ids the service never issued
pub const PLACEHOLDER_PROGRESS: u8 = 75;

/// Unit of background work handed to the worker pool
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub request_id: Uuid,
    pub request: AnalysisRequest,
    /// Resolved at submission when the service area was checked
    pub location: LocationInfo,
    pub created_at: DateTime<Utc>,
}

/// Response to an accepted submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub request_id: Uuid,
    pub status: AnalysisStatus,
    pub message: String,
    pub estimated_time_seconds: u64,
}

/// What a poller sees for one request id
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatusView {
    Completed(Box<AnalysisResult>),
    #[serde(rename_all = "camelCase")]
    Processing {
        request_id: Uuid,
        status: AnalysisStatus,
        progress: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        stage: Option<PipelineStage>,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        request_id: Uuid,
        status: AnalysisStatus,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        completed_at: Option<DateTime<Utc>>,
    },
}

impl StatusView {
    /// Fabricated "processing" response for an unknown id
    pub fn placeholder(request_id: Uuid) -> Self {
        StatusView::Processing {
            request_id,
            status: AnalysisStatus::Processing,
            progress: PLACEHOLDER_PROGRESS,
            stage: None,
            message: PROCESSING_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        match self {
            StatusView::Completed(result) => result.status,
            StatusView::Processing { status, .. } | StatusView::Failed { status, .. } => *status,
        }
    }
}
