//! Analysis orchestrator
//!
//! Sequences one analysis run through every stage:
//!
//! ACCEPTED → GEOCODING → CLIMATE_FETCH → ROOF_ANALYSIS → PREDICTION →
//! ECONOMICS → ENVIRONMENTAL → PERSISTING → COMPLETED
//!
//! A fault in any stage stops the run; no later stage executes. Providers are
//! injected as trait objects so tests can swap in failing or slow ones.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use solarscan_common::config::ServiceConfig;
use solarscan_common::events::{AnalysisEvent, EventBus, PipelineStage};
use uuid::Uuid;

use super::{
    compute_environmental, ClimateFetcher, EconomicCalculator, GenerationModel,
    GenerationPredictor, GeocodeError, Geocoder, LogNotifier, Notifier, RoofAnalyzer, StaticClimateFetcher,
    StaticGeocoder, StaticRoofAnalyzer,
};
use crate::error::AnalysisError;
use crate::models::{
    AnalysisJob, AnalysisResult, AnalysisStatus, LocationEstimate, LocationInfo,
};

/// Receives progress and the finished result of a run
///
/// Implemented by the lifecycle store adapter; tests use in-memory recorders.
#[async_trait]
pub trait PipelineSink: Send + Sync {
    /// Advisory progress; must not fail the run
    async fn stage_changed(&self, request_id: Uuid, stage: PipelineStage);

    /// Store the completed result
    async fn persist(&self, result: &AnalysisResult) -> Result<(), AnalysisError>;
}

/// Analysis orchestrator service
pub struct AnalysisOrchestrator {
    geocoder: Arc<dyn Geocoder>,
    climate_fetcher: Arc<dyn ClimateFetcher>,
    roof_analyzer: Arc<dyn RoofAnalyzer>,
    notifier: Arc<dyn Notifier>,
    predictor: GenerationPredictor,
    economics: EconomicCalculator,
    event_bus: EventBus,
}

impl AnalysisOrchestrator {
    /// Orchestrator with placeholder providers and default economics
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            geocoder: Arc::new(StaticGeocoder::new()),
            climate_fetcher: Arc::new(StaticClimateFetcher::new()),
            roof_analyzer: Arc::new(StaticRoofAnalyzer::new()),
            notifier: Arc::new(LogNotifier),
            predictor: GenerationPredictor::default(),
            economics: EconomicCalculator::default(),
            event_bus,
        }
    }

    pub fn from_config(config: &ServiceConfig, event_bus: EventBus) -> Self {
        let mut orchestrator = Self::new(event_bus);
        orchestrator.economics = EconomicCalculator::from_config(&config.economics);
        orchestrator
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn with_climate_fetcher(mut self, climate_fetcher: Arc<dyn ClimateFetcher>) -> Self {
        self.climate_fetcher = climate_fetcher;
        self
    }

    pub fn with_roof_analyzer(mut self, roof_analyzer: Arc<dyn RoofAnalyzer>) -> Self {
        self.roof_analyzer = roof_analyzer;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_model(mut self, model: Arc<dyn GenerationModel>) -> Self {
        self.predictor = GenerationPredictor::new(model);
        self
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn predictor(&self) -> &GenerationPredictor {
        &self.predictor
    }

    pub fn economics(&self) -> &EconomicCalculator {
        &self.economics
    }

    /// Geocoding stage on its own, used before a request is scheduled
    ///
    /// Unresolvable addresses are the caller's fault; a provider outage is not.
    pub async fn resolve_location(&self, address: &str) -> Result<LocationInfo, AnalysisError> {
        self.geocoder.geocode(address).await.map_err(|e| match e {
            GeocodeError::EmptyAddress | GeocodeError::NotFound(_) => {
                AnalysisError::InvalidAddress(e.to_string())
            }
            GeocodeError::Provider(_) => {
                tracing::warn!(error = %e, "Geocoding provider unavailable");
                AnalysisError::Internal(e.to_string())
            }
        })
    }

    /// Run every stage after acceptance for `job`
    ///
    /// The location resolved at submission is reused for the geocoding stage.
    /// Returns the stored result, or `AnalysisError::Pipeline` naming the stage
    /// that faulted.
    pub async fn execute(
        &self,
        job: &AnalysisJob,
        sink: &dyn PipelineSink,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request_id = job.request_id;
        let mut stage = PipelineStage::Accepted;

        self.advance(request_id, &mut stage, PipelineStage::Geocoding, sink).await;
        let location = job.location.clone();

        self.advance(request_id, &mut stage, PipelineStage::ClimateFetch, sink).await;
        let climate = self
            .climate_fetcher
            .fetch_climate(location.latitude, location.longitude)
            .await
            .map_err(|e| stage_failure(stage, e))?;

        self.advance(request_id, &mut stage, PipelineStage::RoofAnalysis, sink).await;
        let roof = self
            .roof_analyzer
            .analyze_roof(location.latitude, location.longitude)
            .await
            .map_err(|e| stage_failure(stage, e))?;
        roof.validate().map_err(|e| stage_failure(stage, e))?;

        self.advance(request_id, &mut stage, PipelineStage::Prediction, sink).await;
        let prediction = self.predictor.predict(&climate, &roof);

        self.advance(request_id, &mut stage, PipelineStage::Economics, sink).await;
        let economics = self.economics.compute(&prediction, &location.region);

        self.advance(request_id, &mut stage, PipelineStage::Environmental, sink).await;
        let environmental = compute_environmental(prediction.annual_generation_kwh);

        self.advance(request_id, &mut stage, PipelineStage::Persisting, sink).await;
        let result = AnalysisResult {
            request_id,
            status: AnalysisStatus::Completed,
            location,
            roof_analysis: roof,
            solar_prediction: prediction,
            economic_analysis: economics,
            environmental_impact: environmental,
            created_at: job.created_at,
            completed_at: Utc::now(),
        };
        sink.persist(&result).await.map_err(|e| match e {
            AnalysisError::Pipeline { .. } => e,
            other => stage_failure(PipelineStage::Persisting, other),
        })?;

        self.event_bus.emit_lossy(AnalysisEvent::StageChanged {
            request_id,
            old_stage: stage,
            new_stage: PipelineStage::Completed,
            timestamp: Utc::now(),
        });

        if let Some(email) = &job.request.email {
            if let Err(e) = self.notifier.notify(email, &result).await {
                tracing::warn!(request_id = %request_id, error = %e, "Result notification failed");
            }
        }

        self.event_bus.emit_lossy(AnalysisEvent::Completed {
            request_id,
            annual_generation_kwh: result.solar_prediction.annual_generation_kwh,
            timestamp: Utc::now(),
        });

        tracing::info!(
            request_id = %request_id,
            annual_generation_kwh = result.solar_prediction.annual_generation_kwh,
            payback_years = result.economic_analysis.payback_period_years,
            "Analysis completed"
        );

        Ok(result)
    }

    /// Quick per-address estimate for comparisons
    ///
    /// Uses the reference roof instead of the vision model. Returns `None`
    /// when the address does not resolve or its climate cannot be fetched.
    pub async fn quick_estimate(&self, address: &str) -> Option<LocationEstimate> {
        let location = match self.geocoder.geocode(address).await {
            Ok(location) => location,
            Err(e) => {
                tracing::debug!(address = %address, error = %e, "Skipping unresolvable address");
                return None;
            }
        };

        let climate = match self
            .climate_fetcher
            .fetch_climate(location.latitude, location.longitude)
            .await
        {
            Ok(climate) => climate,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Climate unavailable, skipping address");
                return None;
            }
        };

        let prediction = self
            .predictor
            .predict(&climate, &StaticRoofAnalyzer::reference_roof());
        let economics = self.economics.compute(&prediction, &location.region);

        Some(LocationEstimate {
            address: address.to_string(),
            avg_solar_radiation: climate.annual_avg_radiation,
            estimated_annual_generation: prediction.annual_generation_kwh,
            estimated_annual_savings: economics.annual_savings,
            location,
        })
    }

    async fn advance(
        &self,
        request_id: Uuid,
        current: &mut PipelineStage,
        next: PipelineStage,
        sink: &dyn PipelineSink,
    ) {
        tracing::debug!(request_id = %request_id, from = ?current, to = ?next, "Stage transition");
        self.event_bus.emit_lossy(AnalysisEvent::StageChanged {
            request_id,
            old_stage: *current,
            new_stage: next,
            timestamp: Utc::now(),
        });
        sink.stage_changed(request_id, next).await;
        *current = next;
    }
}

fn stage_failure(stage: PipelineStage, error: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Pipeline {
        stage,
        message: error.to_string(),
    }
}
