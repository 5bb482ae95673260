//! GeoJSON heatmap payload

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Value plotted per heatmap point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapMetric {
    /// Mean daily radiation (kWh/m²/day)
    SolarRadiation,
    /// Annual savings of the reference installation (won)
    CostSavings,
    /// 20-year return of the reference installation (won)
    Roi,
}

impl std::str::FromStr for HeatmapMetric {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solar_radiation" => Ok(HeatmapMetric::SolarRadiation),
            "cost_savings" => Ok(HeatmapMetric::CostSavings),
            "roi" => Ok(HeatmapMetric::Roi),
            _ => Err(AnalysisError::InvalidMetric(s.to_string())),
        }
    }
}

/// GeoJSON `FeatureCollection`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<HeatmapFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<HeatmapFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: HeatmapProperties,
}

impl HeatmapFeature {
    pub fn point(longitude: f64, latitude: f64, properties: HeatmapProperties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: PointGeometry {
                kind: "Point".to_string(),
                coordinates: [longitude, latitude],
            },
            properties,
        }
    }
}

/// GeoJSON point; coordinates are `[longitude, latitude]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapProperties {
    pub value: f64,
    pub city: String,
}
