//! Roof analysis from satellite imagery
//!
//! Placeholder until the vision model is integrated.

use async_trait::async_trait;

use super::ProviderError;
use crate::models::{CompassDirection, Obstacle, PanelLayout, RoofAnalysis};

/// Derives roof geometry and a panel layout for a coordinate
///
/// Implementations must return `usable_area <= area` and a layout whose
/// capacity matches its panel count (see [`RoofAnalysis::validate`]).
#[async_trait]
pub trait RoofAnalyzer: Send + Sync {
    async fn analyze_roof(&self, latitude: f64, longitude: f64) -> Result<RoofAnalysis, ProviderError>;
}

#[derive(Debug, Default, Clone)]
pub struct StaticRoofAnalyzer;

impl StaticRoofAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Reference roof: 150 m² south-facing, 6x10 panels (18 kW)
    pub fn reference_roof() -> RoofAnalysis {
        RoofAnalysis {
            area: 150.0,
            direction: CompassDirection::S,
            angle: 25.0,
            usable_area: 135.0,
            obstacles: vec![
                Obstacle {
                    kind: "chimney".to_string(),
                    area: 2.5,
                },
                Obstacle {
                    kind: "skylight".to_string(),
                    area: 5.0,
                },
            ],
            optimal_layout: PanelLayout::grid(6, 10),
        }
    }
}

#[async_trait]
impl RoofAnalyzer for StaticRoofAnalyzer {
    async fn analyze_roof(&self, latitude: f64, longitude: f64) -> Result<RoofAnalysis, ProviderError> {
        tracing::debug!(latitude, longitude, "Analyzing roof (static)");
        Ok(Self::reference_roof())
    }
}
