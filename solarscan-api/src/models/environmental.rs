//! Environmental impact

use serde::{Deserialize, Serialize};

/// Yearly environmental equivalents of the predicted generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub co2_reduction_tons: f64,
    pub tree_equivalent_count: u64,
    pub oil_savings_liters: f64,
}
