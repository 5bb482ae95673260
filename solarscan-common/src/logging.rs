//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when set.

use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter used by [`init`]
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", default_level)))
}

/// Install the global fmt subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize tracing: {}", e)))
}
