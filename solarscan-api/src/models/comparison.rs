//! Multi-address comparison

use serde::{Deserialize, Serialize};

use super::LocationInfo;

/// POST /api/v1/compare body
#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    pub addresses: Vec<String>,
}

/// Quick estimate for one compared address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEstimate {
    pub address: String,
    pub location: LocationInfo,
    pub avg_solar_radiation: f64,
    pub estimated_annual_generation: f64,
    pub estimated_annual_savings: i64,
}

/// Parallel series for charting, in result order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetrics {
    pub solar_radiation: Vec<f64>,
    pub annual_generation: Vec<f64>,
    pub annual_savings: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub results: Vec<LocationEstimate>,
    pub best_location: LocationEstimate,
    pub comparison_metrics: ComparisonMetrics,
}
