//! Analysis pipeline events
//!
//! Provides the pipeline stage definition shared by the orchestrator and its
//! observers, plus the broadcast `EventBus` the orchestrator reports through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Stage of one analysis run
///
/// Progression:
/// ACCEPTED → GEOCODING → CLIMATE_FETCH → ROOF_ANALYSIS → PREDICTION →
/// ECONOMICS → ENVIRONMENTAL → PERSISTING → COMPLETED | FAILED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Accepted,
    Geocoding,
    ClimateFetch,
    RoofAnalysis,
    Prediction,
    Economics,
    Environmental,
    Persisting,
    Completed,
    Failed,
}

impl PipelineStage {
    /// Non-terminal stages in execution order
    pub const SEQUENCE: [PipelineStage; 8] = [
        PipelineStage::Accepted,
        PipelineStage::Geocoding,
        PipelineStage::ClimateFetch,
        PipelineStage::RoofAnalysis,
        PipelineStage::Prediction,
        PipelineStage::Economics,
        PipelineStage::Environmental,
        PipelineStage::Persisting,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Completed | PipelineStage::Failed)
    }

    /// Rough progress indicator (0-100) for polling clients
    ///
    /// Terminal stages report 100.
    pub fn progress_percent(&self) -> u8 {
        if self.is_terminal() {
            return 100;
        }
        let index = Self::SEQUENCE
            .iter()
            .position(|stage| stage == self)
            .unwrap_or(0);
        ((index * 100) / Self::SEQUENCE.len()) as u8
    }
}

/// Events emitted while analyses run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    /// Request accepted and queued
    Accepted {
        request_id: Uuid,
        address: String,
        timestamp: DateTime<Utc>,
    },

    /// Pipeline moved to a new stage
    StageChanged {
        request_id: Uuid,
        old_stage: PipelineStage,
        new_stage: PipelineStage,
        timestamp: DateTime<Utc>,
    },

    /// Analysis finished with a result
    Completed {
        request_id: Uuid,
        annual_generation_kwh: f64,
        timestamp: DateTime<Utc>,
    },

    /// Analysis failed; `stage` is where it stopped
    Failed {
        request_id: Uuid,
        stage: PipelineStage,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl AnalysisEvent {
    pub fn request_id(&self) -> Uuid {
        match self {
            AnalysisEvent::Accepted { request_id, .. }
            | AnalysisEvent::StageChanged { request_id, .. }
            | AnalysisEvent::Completed { request_id, .. }
            | AnalysisEvent::Failed { request_id, .. } => *request_id,
        }
    }
}

/// Broadcast bus for [`AnalysisEvent`]s
///
/// Slow subscribers lose the oldest events once the channel capacity is exceeded.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AnalysisEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: AnalysisEvent,
    ) -> Result<usize, broadcast::error::SendError<AnalysisEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: AnalysisEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
