//! Integration tests for the solarscan-api HTTP surface

mod helpers;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use solarscan_common::config::{ServiceConfig, UnknownRequestPolicy};
use uuid::Uuid;

use helpers::*;

#[tokio::test]
async fn test_root_banner() {
    let app = test_app();
    let (status, json) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], "SolarScan API");
    assert_eq!(json["status"], "running");
    assert_eq!(json["docs"], "/docs");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["module"], "solarscan-api");
    assert!(json["timestamp"].is_string());
    assert!(json["uptimeSeconds"].is_u64());
    assert_eq!(json["queueDepth"], 0);
}

#[tokio::test]
async fn test_submit_gyeonggi_address() {
    let app = test_app();
    let (status, json) = post_json(
        &app,
        "/api/v1/analysis",
        json!({ "address": SUWON_ADDRESS, "buildingType": "house" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "processing");
    assert_eq!(json["estimatedTimeSeconds"], 30);
    assert!(json["message"].as_str().unwrap().contains("30 seconds"));
    assert!(Uuid::parse_str(json["requestId"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_submit_outside_service_area_rejected() {
    let app = test_app();
    let (status, json) =
        post_json(&app, "/api/v1/analysis", json!({ "address": SEOUL_ADDRESS })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "UNSUPPORTED_REGION");
}

#[tokio::test]
async fn test_submit_unresolvable_address_rejected() {
    let app = test_app();
    let (status, json) =
        post_json(&app, "/api/v1/analysis", json!({ "address": "NOTFOUND 123" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_ADDRESS");

    let (status, json) = post_json(&app, "/api/v1/analysis", json!({ "address": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_ADDRESS");
}

#[tokio::test]
async fn test_geocoder_outage_is_internal_error() {
    let app = test_app_with(
        ServiceConfig::default(),
        orchestrator().with_geocoder(Arc::new(DownGeocoder)),
    );
    let (status, json) =
        post_json(&app, "/api/v1/analysis", json!({ "address": SUWON_ADDRESS })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    assert!(json["error"]["errorId"].as_str().unwrap().parse::<Uuid>().is_ok());
    let message = json["error"]["message"].as_str().unwrap();
    assert!(!message.contains("kakao"));
    assert!(!message.contains("503"));
}

#[tokio::test]
async fn test_submit_invalid_email_rejected() {
    let app = test_app();
    let (status, json) = post_json(
        &app,
        "/api/v1/analysis",
        json!({ "address": SUWON_ADDRESS, "email": "not-an-email" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_EMAIL");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = test_app();
    let (status, json) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/analysis")
            .header("content-type", "application/json")
            .body(Body::from("{\"address\": "))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_submitted_analysis_completes() {
    let app = test_app();
    let (_, receipt) = post_json(
        &app,
        "/api/v1/analysis",
        json!({ "address": SUWON_ADDRESS, "email": "owner@example.com" }),
    )
    .await;
    let request_id = receipt["requestId"].as_str().unwrap().to_string();

    let result = poll_until_terminal(&app, &request_id).await;

    assert_eq!(result["status"], "completed");
    assert_eq!(result["requestId"], request_id.as_str());
    assert_eq!(result["location"]["region"], "경기도 수원시 영통구");
    assert_eq!(result["roofAnalysis"]["optimalLayout"]["panelCount"], 60);
    assert_eq!(result["roofAnalysis"]["optimalLayout"]["totalCapacityKW"], 18.0);
    assert_eq!(result["solarPrediction"]["annualGenerationKWh"], 22178.88);
    assert_eq!(result["solarPrediction"]["dailyAverageKWh"], 60.76);
    assert_eq!(result["solarPrediction"]["monthlyGenerationKWh"]["1"], 1185.75);
    assert_eq!(result["economicAnalysis"]["installationCost"], 90_000_000);
    assert_eq!(result["economicAnalysis"]["subsidyAmount"], 18_000_000);
    assert_eq!(result["economicAnalysis"]["netCost"], 72_000_000);
    assert_eq!(result["economicAnalysis"]["paybackPeriodYears"], 21.6);
    assert_eq!(result["environmentalImpact"]["co2ReductionTons"], 9.4);
    assert_eq!(result["environmentalImpact"]["treeEquivalentCount"], 1424);
}

#[tokio::test]
async fn test_unknown_request_id_is_not_found() {
    let app = test_app();
    let (status, json) = get(&app, &format!("/api/v1/analysis/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_request_id_placeholder_policy() {
    let mut config = ServiceConfig::default();
    config.pipeline.unknown_request_policy = UnknownRequestPolicy::ProcessingStub;
    let app = test_app_with(config, orchestrator());

    let id = Uuid::new_v4();
    let (status, json) = get(&app, &format!("/api/v1/analysis/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "processing");
    assert_eq!(json["progress"], 75);
    assert_eq!(json["requestId"], id.to_string());
}

#[tokio::test]
async fn test_malformed_request_id_is_bad_request() {
    let app = test_app();
    let (status, json) = get(&app, "/api/v1/analysis/not-a-uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_failed_analysis_reports_error() {
    let app = test_app_with(
        ServiceConfig::default(),
        orchestrator().with_roof_analyzer(Arc::new(FailingRoof)),
    );
    let (_, receipt) =
        post_json(&app, "/api/v1/analysis", json!({ "address": SUWON_ADDRESS })).await;
    let request_id = receipt["requestId"].as_str().unwrap().to_string();

    let result = poll_until_terminal(&app, &request_id).await;

    assert_eq!(result["status"], "failed");
    assert!(result["error"].as_str().unwrap().contains("vision model offline"));
    assert!(result.get("solarPrediction").is_none());
}

#[tokio::test]
async fn test_compare_address_count_bounds() {
    let app = test_app();

    let (status, json) =
        post_json(&app, "/api/v1/compare", json!({ "addresses": [SUWON_ADDRESS] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_COMPARE_COUNT");

    let six: Vec<String> = (0..6).map(|i| format!("경기도 수원시 {}번지", i)).collect();
    let (status, json) = post_json(&app, "/api/v1/compare", json!({ "addresses": six })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_COMPARE_COUNT");
}

#[tokio::test]
async fn test_compare_picks_highest_radiation() {
    let app = test_app_with(
        ServiceConfig::default(),
        orchestrator().with_climate_fetcher(Arc::new(LatitudeClimate)),
    );

    let (status, json) = post_json(
        &app,
        "/api/v1/compare",
        json!({ "addresses": [
            "경기도 고양시 일산동구",
            "경기도 화성시 동탄대로",
            SUWON_ADDRESS,
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 3);
    assert_eq!(json["bestLocation"]["address"], "경기도 화성시 동탄대로");
    assert_eq!(json["comparisonMetrics"]["solarRadiation"].as_array().unwrap().len(), 3);

    let radiation: Vec<f64> = json["comparisonMetrics"]["solarRadiation"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    let best = json["bestLocation"]["avgSolarRadiation"].as_f64().unwrap();
    assert!(radiation.iter().all(|r| *r <= best));
}

#[tokio::test]
async fn test_compare_tie_goes_to_first_and_skips_unresolvable() {
    let app = test_app();
    let (status, json) = post_json(
        &app,
        "/api/v1/compare",
        json!({ "addresses": ["NOTFOUND 1", "경기도 성남시 분당구", "경기도 용인시 수지구"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["bestLocation"]["address"], "경기도 성남시 분당구");
    assert_eq!(json["results"][0]["estimatedAnnualGeneration"], 22178.88);
    assert_eq!(json["results"][0]["estimatedAnnualSavings"], 3_326_832);
}

#[tokio::test]
async fn test_compare_with_nothing_resolvable() {
    let app = test_app();
    let (status, json) = post_json(
        &app,
        "/api/v1/compare",
        json!({ "addresses": ["NOTFOUND 1", "notfound 2"] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_ADDRESS");
}

#[tokio::test]
async fn test_heatmap_defaults() {
    let app = test_app();
    let (status, json) = get(&app, "/api/v1/heatmap").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "FeatureCollection");
    let features = json["features"].as_array().unwrap();
    assert!(!features.is_empty());
    assert_eq!(features[0]["type"], "Feature");
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[0]["geometry"]["coordinates"][0], 127.0444);
    assert_eq!(features[0]["properties"]["value"], 4.5);
    assert_eq!(features[0]["properties"]["city"], "수원시");
}

#[tokio::test]
async fn test_heatmap_metric_and_region_validation() {
    let app = test_app();

    let (status, json) = get(&app, "/api/v1/heatmap?metric=wind_speed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_METRIC");

    let (status, json) = get(&app, "/api/v1/heatmap?region=jeju").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "UNSUPPORTED_REGION");

    let (status, json) = get(&app, "/api/v1/heatmap?region=gyeonggi&metric=roi").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["features"][0]["properties"]["value"].is_number());
}

#[tokio::test]
async fn test_heatmap_malformed_query_uses_error_envelope() {
    let app = test_app();

    let (status, json) = get(&app, "/api/v1/heatmap?region=gyeonggi&region=seoul").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(json["error"]["message"].is_string());
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let app = test_app();

    let response = tower::util::ServiceExt::oneshot(
        app.clone(),
        Request::builder()
            .uri("/health")
            .header("origin", "https://solarscan.kr")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "https://solarscan.kr"
    );
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");

    let response = tower::util::ServiceExt::oneshot(
        app,
        Request::builder()
            .uri("/health")
            .header("origin", "https://evil.example")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
