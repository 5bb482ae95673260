//! Generation prediction

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Predicted PV output for a roof
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarPrediction {
    #[serde(rename = "recommendedCapacityKW")]
    pub recommended_capacity_kw: f64,
    pub panel_count: u32,
    #[serde(rename = "annualGenerationKWh")]
    pub annual_generation_kwh: f64,
    /// Month (1-12) → kWh
    #[serde(rename = "monthlyGenerationKWh")]
    pub monthly_generation_kwh: BTreeMap<u8, f64>,
    #[serde(rename = "dailyAverageKWh")]
    pub daily_average_kwh: f64,
    /// Model certainty in [0, 1]
    pub confidence_score: f64,
}
