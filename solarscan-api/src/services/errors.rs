//! Provider error types

use thiserror::Error;

/// Geocoding failure
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("address is empty")]
    EmptyAddress,

    #[error("address could not be resolved: {0}")]
    NotFound(String),

    #[error("geocoding provider error: {0}")]
    Provider(String),
}

/// Climate / roof provider failure
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider returned invalid data: {0}")]
    InvalidData(String),
}

/// Result notification failure
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}
