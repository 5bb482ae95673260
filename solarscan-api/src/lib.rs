//! solarscan-api library interface
//!
//! Exposes the router and application state for the binary and for
//! integration tests.

pub mod api;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::error::{AnalysisError, ApiResult};

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Response},
    response::IntoResponse,
    Router,
};
use chrono::{DateTime, Utc};
use solarscan_common::config::{CorsConfig, ServiceConfig};
use solarscan_common::events::EventBus;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::lifecycle::RequestLifecycleManager;
use crate::services::AnalysisOrchestrator;

/// Capacity of the analysis event channel
pub const EVENT_BUS_CAPACITY: usize = 1000;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub lifecycle: Arc<RequestLifecycleManager>,
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// State with placeholder providers; spawns the worker pool
    pub fn new(config: ServiceConfig) -> Self {
        let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
        let orchestrator = AnalysisOrchestrator::from_config(&config, event_bus);
        Self::with_orchestrator(config, orchestrator)
    }

    /// State around a preconfigured orchestrator (custom providers)
    pub fn with_orchestrator(config: ServiceConfig, orchestrator: AnalysisOrchestrator) -> Self {
        let event_bus = orchestrator.event_bus().clone();
        let orchestrator = Arc::new(orchestrator);
        let lifecycle = Arc::new(RequestLifecycleManager::new(&config, Arc::clone(&orchestrator)));
        Self {
            config: Arc::new(config),
            orchestrator,
            lifecycle,
            event_bus,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .merge(api::health_routes())
        .merge(api::analysis_routes())
        .merge(api::compare_routes())
        .merge(api::heatmap_routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Origin allow-list with credentials; methods and headers mirror the preflight
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<axum::body::Body> {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AnalysisError::Internal(format!("handler panicked: {}", detail)).into_response()
}
