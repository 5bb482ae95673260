//! Regional heatmap
//!
//! Point values come from a static table of Gyeonggi cities until the
//! climate platform grid is integrated.

use crate::error::AnalysisError;
use crate::models::{FeatureCollection, HeatmapFeature, HeatmapMetric, HeatmapProperties};
use crate::utils::round_to;

use super::{EconomicCalculator, GenerationPredictor, StaticClimateFetcher, StaticRoofAnalyzer};

/// The only region with heatmap data
pub const SUPPORTED_REGION: &str = "gyeonggi";

struct CityPoint {
    city: &'static str,
    longitude: f64,
    latitude: f64,
    /// Mean daily radiation (kWh/m²/day)
    radiation: f64,
}

const GYEONGGI_CITIES: &[CityPoint] = &[
    CityPoint { city: "수원시", longitude: 127.0444, latitude: 37.2858, radiation: 4.5 },
    CityPoint { city: "성남시", longitude: 127.1267, latitude: 37.4200, radiation: 4.3 },
    CityPoint { city: "용인시", longitude: 127.1776, latitude: 37.2411, radiation: 4.4 },
    CityPoint { city: "고양시", longitude: 126.8320, latitude: 37.6584, radiation: 4.2 },
    CityPoint { city: "화성시", longitude: 126.8310, latitude: 37.1995, radiation: 4.6 },
    CityPoint { city: "부천시", longitude: 126.7660, latitude: 37.5034, radiation: 4.1 },
];

/// Build the GeoJSON heatmap for `region`
///
/// Monetary metrics run the reference installation through the calculators
/// with baseline climate scaled to each city's radiation.
pub fn build_heatmap(
    region: &str,
    metric: HeatmapMetric,
    predictor: &GenerationPredictor,
    economics: &EconomicCalculator,
) -> Result<FeatureCollection, AnalysisError> {
    if !region.trim().eq_ignore_ascii_case(SUPPORTED_REGION) {
        return Err(AnalysisError::UnsupportedRegion(region.to_string()));
    }

    let baseline = StaticClimateFetcher::baseline();
    let roof = StaticRoofAnalyzer::reference_roof();

    let features = GYEONGGI_CITIES
        .iter()
        .map(|point| {
            let value = match metric {
                HeatmapMetric::SolarRadiation => point.radiation,
                HeatmapMetric::CostSavings | HeatmapMetric::Roi => {
                    let prediction = predictor.predict(&baseline.scaled_to(point.radiation), &roof);
                    let analysis = economics.compute(&prediction, &format!("경기도 {}", point.city));
                    if metric == HeatmapMetric::CostSavings {
                        analysis.annual_savings as f64
                    } else {
                        analysis.roi_20_years as f64
                    }
                }
            };
            HeatmapFeature::point(
                point.longitude,
                point.latitude,
                HeatmapProperties {
                    value: round_to(value, 2),
                    city: point.city.to_string(),
                },
            )
        })
        .collect();

    Ok(FeatureCollection::new(features))
}
