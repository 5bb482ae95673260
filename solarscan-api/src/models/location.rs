//! Geocoded location

use serde::{Deserialize, Serialize};

/// Result of geocoding one address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Administrative region (province / city / district)
    pub region: String,
}
