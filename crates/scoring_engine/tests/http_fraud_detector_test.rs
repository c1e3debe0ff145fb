//! HTTP Fraud Detector Tests
//!
//! Runs the HTTP detector against an axum mock scorer bound to port 0.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use scoring_core::types::{AssessmentId, AssessmentRequest, Transaction};
use scoring_engine::{
    EngineConfig, ErrorKind, FraudCheckRequest, FraudDetector, FraudError, HttpFraudDetector,
    InMemoryEventBus, InMemoryRiskStore, RiskAssessmentEngine,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Scores 100 points per transaction.
async fn score_by_count(Json(body): Json<Value>) -> Json<Value> {
    let count = body["transactions"].as_array().map_or(0, Vec::len);
    Json(json!({ "fraudScore": 100.0 * count as f64, "riskLevel": "MEDIUM" }))
}

async fn unavailable() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "scorer offline")
}

async fn malformed() -> &'static str {
    "not json"
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({ "fraudScore": 1.0 }))
}

async fn spawn_mock_scorer() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let router = Router::new()
        .route("/score", post(score_by_count))
        .route("/unavailable", post(unavailable))
        .route("/malformed", post(malformed))
        .route("/slow", post(slow));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(10)).await;

    (addr, handle)
}

fn check_request(transactions: usize) -> FraudCheckRequest {
    let request = AssessmentRequest::new("CUST-HTTP")
        .with_transactions(vec![Transaction::new(42.0); transactions]);
    FraudCheckRequest::from_assessment(AssessmentId::generate(), &request)
}

fn detector(addr: SocketAddr, path: &str, timeout_ms: u64) -> HttpFraudDetector {
    HttpFraudDetector::new(
        format!("http://{}{}", addr, path),
        Duration::from_millis(timeout_ms),
    )
    .unwrap()
}

#[tokio::test]
async fn test_http_detector_posts_evidence() {
    let (addr, handle) = spawn_mock_scorer().await;

    let response = detector(addr, "/score", 1_000)
        .check(&check_request(3))
        .await
        .unwrap();

    assert_eq!(response.fraud_score, 300.0);
    assert_eq!(response.risk_level.as_deref(), Some("MEDIUM"));

    handle.abort();
}

#[tokio::test]
async fn test_http_detector_maps_error_status() {
    let (addr, handle) = spawn_mock_scorer().await;

    let err = detector(addr, "/unavailable", 1_000)
        .check(&check_request(1))
        .await
        .unwrap_err();
    assert_eq!(err, FraudError::Status(503));

    handle.abort();
}

#[tokio::test]
async fn test_http_detector_rejects_malformed_body() {
    let (addr, handle) = spawn_mock_scorer().await;

    let err = detector(addr, "/malformed", 1_000)
        .check(&check_request(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FraudError::Decode(_)));

    handle.abort();
}

#[tokio::test]
async fn test_http_detector_times_out() {
    let (addr, handle) = spawn_mock_scorer().await;

    let err = detector(addr, "/slow", 50)
        .check(&check_request(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FraudError::Transport(_)));

    handle.abort();
}

#[tokio::test]
async fn test_engine_with_http_detector() {
    let (addr, handle) = spawn_mock_scorer().await;

    let engine = RiskAssessmentEngine::new(
        EngineConfig {
            deadline_ms: 2_000,
            ..Default::default()
        },
        Arc::new(InMemoryRiskStore::new()),
        Arc::new(detector(addr, "/score", 1_000)),
        Arc::new(InMemoryEventBus::new()),
    )
    .unwrap();

    // Empty history: the mock answers 0
    let response = engine
        .assess(AssessmentRequest::new("CUST-HTTP"))
        .await
        .unwrap();
    assert_eq!(response.breakdown.fraud, 0.0);
    assert_eq!(response.fraud_risk_level.as_deref(), Some("MEDIUM"));

    handle.abort();
}

#[tokio::test]
async fn test_engine_surfaces_http_failure_as_collaborator_error() {
    let (addr, handle) = spawn_mock_scorer().await;
    let store = InMemoryRiskStore::new();

    let engine = RiskAssessmentEngine::new(
        EngineConfig {
            deadline_ms: 2_000,
            ..Default::default()
        },
        Arc::new(store.clone()),
        Arc::new(detector(addr, "/unavailable", 1_000)),
        Arc::new(InMemoryEventBus::new()),
    )
    .unwrap();

    let err = engine
        .assess(AssessmentRequest::new("CUST-HTTP"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Collaborator);
    assert_eq!(store.statistics().unwrap().scores, 0);

    handle.abort();
}
