//! Monthly climate series

use serde::{Deserialize, Serialize};

/// Climate normals for one location
///
/// Monthly arrays are January-first and always hold 12 entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateData {
    /// Daily solar radiation per month (kWh/m²/day)
    pub monthly_radiation: [f64; 12],
    /// Mean temperature per month (°C)
    pub monthly_temperature: [f64; 12],
    /// Annual mean of daily radiation (kWh/m²/day)
    pub annual_avg_radiation: f64,
    pub sunshine_hours: f64,
}

impl ClimateData {
    /// Copy of this series with radiation scaled so the annual mean becomes `target_avg`
    pub fn scaled_to(&self, target_avg: f64) -> ClimateData {
        if self.annual_avg_radiation <= 0.0 {
            return self.clone();
        }
        let factor = target_avg / self.annual_avg_radiation;
        let mut scaled = self.clone();
        for value in scaled.monthly_radiation.iter_mut() {
            *value *= factor;
        }
        scaled.annual_avg_radiation = target_avg;
        scaled
    }
}
