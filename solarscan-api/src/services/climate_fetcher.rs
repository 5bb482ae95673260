//! Climate data retrieval
//!
//! The static fetcher returns Gyeonggi climate-platform normals for every
//! coordinate until the platform API is wired in.

use async_trait::async_trait;

use super::ProviderError;
use crate::models::ClimateData;

/// Supplies a full 12-month climate series for a coordinate
#[async_trait]
pub trait ClimateFetcher: Send + Sync {
    async fn fetch_climate(&self, latitude: f64, longitude: f64) -> Result<ClimateData, ProviderError>;
}

const BASELINE_RADIATION: [f64; 12] = [2.5, 3.0, 3.8, 4.5, 5.2, 5.5, 5.3, 5.0, 4.2, 3.5, 2.8, 2.3];
const BASELINE_TEMPERATURE: [f64; 12] = [
    -2.0, 1.0, 7.0, 13.0, 18.0, 23.0, 26.0, 27.0, 22.0, 15.0, 8.0, 1.0,
];
const BASELINE_ANNUAL_AVG_RADIATION: f64 = 4.0;
const BASELINE_SUNSHINE_HOURS: f64 = 2500.0;

#[derive(Debug, Default, Clone)]
pub struct StaticClimateFetcher;

impl StaticClimateFetcher {
    pub fn new() -> Self {
        Self
    }

    /// The series every coordinate currently resolves to
    pub fn baseline() -> ClimateData {
        ClimateData {
            monthly_radiation: BASELINE_RADIATION,
            monthly_temperature: BASELINE_TEMPERATURE,
            annual_avg_radiation: BASELINE_ANNUAL_AVG_RADIATION,
            sunshine_hours: BASELINE_SUNSHINE_HOURS,
        }
    }
}

#[async_trait]
impl ClimateFetcher for StaticClimateFetcher {
    async fn fetch_climate(&self, latitude: f64, longitude: f64) -> Result<ClimateData, ProviderError> {
        tracing::debug!(latitude, longitude, "Fetching climate normals (static)");
        Ok(Self::baseline())
    }
}
