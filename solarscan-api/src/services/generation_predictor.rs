//! Generation prediction
//!
//! The model core is pluggable; `EfficiencyModel` applies a flat system
//! efficiency until the trained model replaces it.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{ClimateData, RoofAnalysis, SolarPrediction};
use crate::utils::round_to;

/// Days per month, January first; no leap-year adjustment
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Flat system efficiency applied to radiation
pub const SYSTEM_EFFICIENCY: f64 = 0.85;

/// Fixed confidence reported while no trained model is available
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.92;

/// Daily yield model behind the predictor
pub trait GenerationModel: Send + Sync {
    /// kWh per day for `capacity_kw` under `radiation` kWh/m²/day
    fn daily_yield_kwh(&self, capacity_kw: f64, radiation: f64) -> f64;

    /// Certainty of the model's output in [0, 1]
    fn confidence(&self) -> f64;
}

/// capacity × radiation × efficiency
#[derive(Debug, Clone)]
pub struct EfficiencyModel {
    pub efficiency: f64,
    pub confidence: f64,
}

impl Default for EfficiencyModel {
    fn default() -> Self {
        Self {
            efficiency: SYSTEM_EFFICIENCY,
            confidence: PLACEHOLDER_CONFIDENCE,
        }
    }
}

impl GenerationModel for EfficiencyModel {
    fn daily_yield_kwh(&self, capacity_kw: f64, radiation: f64) -> f64 {
        capacity_kw * radiation * self.efficiency
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }
}

#[derive(Clone)]
pub struct GenerationPredictor {
    model: Arc<dyn GenerationModel>,
}

impl Default for GenerationPredictor {
    fn default() -> Self {
        Self::new(Arc::new(EfficiencyModel::default()))
    }
}

impl GenerationPredictor {
    pub fn new(model: Arc<dyn GenerationModel>) -> Self {
        Self { model }
    }

    /// Predict monthly and annual output for the roof's optimal layout
    ///
    /// The annual total is the sum of unrounded monthly values, rounded to 2
    /// decimals; reported monthly values are rounded individually.
    pub fn predict(&self, climate: &ClimateData, roof: &RoofAnalysis) -> SolarPrediction {
        let capacity = roof.optimal_layout.total_capacity_kw;

        let mut monthly = BTreeMap::new();
        let mut annual_raw = 0.0;
        for (index, (radiation, days)) in climate
            .monthly_radiation
            .iter()
            .zip(DAYS_IN_MONTH.iter())
            .enumerate()
        {
            let month_total = self.model.daily_yield_kwh(capacity, *radiation) * f64::from(*days);
            annual_raw += month_total;
            monthly.insert((index + 1) as u8, round_to(month_total, 2));
        }

        let annual = round_to(annual_raw, 2);

        SolarPrediction {
            recommended_capacity_kw: capacity,
            panel_count: roof.optimal_layout.panel_count,
            annual_generation_kwh: annual,
            monthly_generation_kwh: monthly,
            daily_average_kwh: round_to(annual / 365.0, 2),
            confidence_score: self.model.confidence().clamp(0.0, 1.0),
        }
    }
}
