//! Completed analysis result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EconomicAnalysis, EnvironmentalImpact, LocationInfo, RoofAnalysis, SolarPrediction};

/// Externally visible request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnalysisStatus::Processing)
    }
}

/// Full output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub request_id: Uuid,
    pub status: AnalysisStatus,
    pub location: LocationInfo,
    pub roof_analysis: RoofAnalysis,
    pub solar_prediction: SolarPrediction,
    pub economic_analysis: EconomicAnalysis,
    pub environmental_impact: EnvironmentalImpact,
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
