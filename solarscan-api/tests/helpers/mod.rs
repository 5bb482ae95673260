//! Shared test fixtures: app construction, request helpers and scripted providers

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use solarscan_api::models::{AnalysisResult, ClimateData, LocationInfo, PanelLayout, RoofAnalysis};
use solarscan_api::services::{
    AnalysisOrchestrator, ClimateFetcher, GeocodeError, Geocoder, Notifier, NotifyError,
    ProviderError, RoofAnalyzer, StaticClimateFetcher, StaticRoofAnalyzer,
};
use solarscan_api::{build_router, AppState};
use solarscan_common::config::ServiceConfig;
use solarscan_common::events::EventBus;

pub const SUWON_ADDRESS: &str = "경기도 수원시 영통구 광교로 156";
pub const SEOUL_ADDRESS: &str = "서울특별시 강남구 테헤란로 152";

pub fn test_app() -> Router {
    build_router(AppState::new(ServiceConfig::default()))
}

pub fn test_app_with(config: ServiceConfig, orchestrator: AnalysisOrchestrator) -> Router {
    build_router(AppState::with_orchestrator(config, orchestrator))
}

pub fn orchestrator() -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(EventBus::new(256))
}

/// Send a request and decode the JSON body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Poll the status endpoint until the request leaves "processing"
pub async fn poll_until_terminal(app: &Router, request_id: &str) -> Value {
    for _ in 0..500 {
        let (status, json) = get(app, &format!("/api/v1/analysis/{}", request_id)).await;
        assert_eq!(status, StatusCode::OK);
        if json["status"] != "processing" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("request {} never finished", request_id);
}

/// Radiation falls with latitude: 4.0 + (38.0 - latitude)
pub struct LatitudeClimate;

#[async_trait]
impl ClimateFetcher for LatitudeClimate {
    async fn fetch_climate(&self, latitude: f64, _longitude: f64) -> Result<ClimateData, ProviderError> {
        Ok(StaticClimateFetcher::baseline().scaled_to(4.0 + (38.0 - latitude)))
    }
}

pub struct FailingRoof;

#[async_trait]
impl RoofAnalyzer for FailingRoof {
    async fn analyze_roof(&self, _: f64, _: f64) -> Result<RoofAnalysis, ProviderError> {
        Err(ProviderError::Unavailable("vision model offline".to_string()))
    }
}

/// Fails the first `failures` calls, then returns the reference roof
pub struct FlakyRoof {
    failures: u32,
    calls: AtomicU32,
}

impl FlakyRoof {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl RoofAnalyzer for FlakyRoof {
    async fn analyze_roof(&self, _: f64, _: f64) -> Result<RoofAnalysis, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(ProviderError::Unavailable(format!("transient failure {}", call + 1)))
        } else {
            Ok(StaticRoofAnalyzer::reference_roof())
        }
    }
}

/// Never finishes within any test timeout
pub struct StalledRoof;

#[async_trait]
impl RoofAnalyzer for StalledRoof {
    async fn analyze_roof(&self, _: f64, _: f64) -> Result<RoofAnalysis, ProviderError> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(StaticRoofAnalyzer::reference_roof())
    }
}

/// Panics on the first call, then returns the reference roof
#[derive(Default)]
pub struct PanicOnceRoof {
    calls: AtomicU32,
}

#[async_trait]
impl RoofAnalyzer for PanicOnceRoof {
    async fn analyze_roof(&self, _: f64, _: f64) -> Result<RoofAnalysis, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("segmentation mask index out of bounds");
        }
        Ok(StaticRoofAnalyzer::reference_roof())
    }
}

/// Reports a panel grid whose panel count does not fit in a u32
pub struct OverflowingRoof;

#[async_trait]
impl RoofAnalyzer for OverflowingRoof {
    async fn analyze_roof(&self, _: f64, _: f64) -> Result<RoofAnalysis, ProviderError> {
        let mut roof = StaticRoofAnalyzer::reference_roof();
        roof.optimal_layout = PanelLayout {
            rows: 70_000,
            columns: 70_000,
            panel_count: 0,
            total_capacity_kw: 0.0,
        };
        Ok(roof)
    }
}

/// Geocoding provider outage
pub struct DownGeocoder;

#[async_trait]
impl Geocoder for DownGeocoder {
    async fn geocode(&self, _address: &str) -> Result<LocationInfo, GeocodeError> {
        Err(GeocodeError::Provider("kakao local api returned 503".to_string()))
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _email: &str, _result: &AnalysisResult) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("SMTP relay refused connection".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, email: &str, _result: &AnalysisResult) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(email.to_string());
        Ok(())
    }
}
