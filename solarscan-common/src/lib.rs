//! # SolarScan Common Library
//!
//! Shared code for the SolarScan services:
//! - Error and result types
//! - Configuration loading (TOML file, environment, compiled defaults)
//! - Tracing subscriber setup
//! - Analysis event bus and pipeline stage definitions

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
