//! Analysis services
//!
//! Provider traits (geocoding, climate, roof vision, notification) with their
//! placeholder implementations, the pure calculators, and the orchestrator
//! that sequences them.

pub mod errors;
pub mod geocoder;
pub mod climate_fetcher;
pub mod roof_analyzer;
pub mod generation_predictor;
pub mod economic_calculator;
pub mod environmental_calculator;
pub mod notifier;
pub mod analysis_orchestrator;
pub mod comparison;
pub mod heatmap;

pub use errors::{GeocodeError, NotifyError, ProviderError};
pub use geocoder::{Geocoder, StaticGeocoder};
pub use climate_fetcher::{ClimateFetcher, StaticClimateFetcher};
pub use roof_analyzer::{RoofAnalyzer, StaticRoofAnalyzer};
pub use generation_predictor::{EfficiencyModel, GenerationModel, GenerationPredictor};
pub use economic_calculator::{EconomicCalculator, SubsidyTable};
pub use environmental_calculator::compute_environmental;
pub use notifier::{LogNotifier, Notifier};
pub use analysis_orchestrator::{AnalysisOrchestrator, PipelineSink};
pub use comparison::compare_addresses;
pub use heatmap::build_heatmap;
