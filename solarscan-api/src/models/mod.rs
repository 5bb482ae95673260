//! Data models for the SolarScan analysis service
//!
//! Wire format is camelCase JSON throughout.

pub mod request;
pub mod location;
pub mod climate;
pub mod roof;
pub mod prediction;
pub mod economics;
pub mod environmental;
pub mod result;
pub mod record;
pub mod comparison;
pub mod heatmap;

pub use request::{AnalysisRequest, BuildingType};
pub use location::LocationInfo;
pub use climate::ClimateData;
pub use roof::{CompassDirection, Obstacle, PanelLayout, RoofAnalysis, PANEL_RATING_KW};
pub use prediction::SolarPrediction;
pub use economics::EconomicAnalysis;
pub use environmental::EnvironmentalImpact;
pub use result::{AnalysisResult, AnalysisStatus};
pub use record::{AnalysisJob, AnalysisRecord, StatusView, SubmitReceipt};
pub use comparison::{CompareRequest, ComparisonMetrics, ComparisonReport, LocationEstimate};
pub use heatmap::{FeatureCollection, HeatmapFeature, HeatmapMetric, HeatmapProperties, PointGeometry};
