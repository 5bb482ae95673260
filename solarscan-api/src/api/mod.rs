//! HTTP API handlers for solarscan-api

pub mod analysis;
pub mod compare;
pub mod health;
pub mod heatmap;

pub use analysis::analysis_routes;
pub use compare::compare_routes;
pub use health::health_routes;
pub use heatmap::heatmap_routes;
