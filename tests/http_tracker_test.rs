//! Integration tests for the HTTP tracking integration.
//!
//! These tests run the tracker against a mock collector and verify the
//! delivered JSON body, error handling for non-success responses, and the
//! fire-and-forget behavior of the `Tracker` impl.

use std::time::Duration;

use dltrack::sender::{HttpTracker, HttpTrackerConfig, HttpTrackerError};
use dltrack::tracker::Tracker;
use dltrack::types::{download_label, TrackedEvent};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

fn sample_event() -> TrackedEvent {
    TrackedEvent::download(download_label("Terraform", "1.5.7"))
}

fn tracker_for(server_uri: &str) -> HttpTracker {
    HttpTracker::new(
        HttpTrackerConfig::new(format!("{server_uri}/collect"))
            .with_request_timeout(Duration::from_secs(2)),
    )
}

// =============================================================================
// Delivery Tests
// =============================================================================

/// The record is posted as JSON with exactly the agreed field names.
#[tokio::test]
async fn test_deliver_posts_exact_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collect"))
        .and(body_json(serde_json::json!({
            "event": "Download",
            "category": "Button",
            "label": "Terraform | v1.5.7",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tracker = tracker_for(&mock_server.uri());
    tracker.deliver(&sample_event()).await.unwrap();
}

/// A non-success response surfaces as a collector error with the status.
#[tokio::test]
async fn test_deliver_reports_collector_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collect"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&mock_server)
        .await;

    let tracker = tracker_for(&mock_server.uri());
    let err = tracker.deliver(&sample_event()).await.unwrap_err();

    match err {
        HttpTrackerError::CollectorError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend down");
        }
        other => panic!("expected CollectorError, got {other:?}"),
    }
}

/// An unreachable collector surfaces as a transport error.
#[tokio::test]
async fn test_deliver_reports_transport_errors() {
    // Port 1 is never a listening collector.
    let tracker = HttpTracker::new(
        HttpTrackerConfig::new("http://127.0.0.1:1/collect".to_string())
            .with_request_timeout(Duration::from_millis(500)),
    );

    let err = tracker.deliver(&sample_event()).await.unwrap_err();
    assert!(matches!(err, HttpTrackerError::Http(_)));
}

// =============================================================================
// Fire-and-forget Tests
// =============================================================================

/// `track` delivers in the background without blocking the caller.
#[tokio::test]
async fn test_track_delivers_in_background() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collect"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tracker = tracker_for(&mock_server.uri());
    tracker.track(sample_event());

    // Give the spawned delivery task time to complete; the mock's expect(1)
    // is verified when the server drops.
    tokio::time::sleep(Duration::from_millis(200)).await;
}

/// A failing collector never panics the click path.
#[tokio::test]
async fn test_track_swallows_delivery_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collect"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let tracker = tracker_for(&mock_server.uri());
    tracker.track(sample_event());
    tracker.track(sample_event());

    tokio::time::sleep(Duration::from_millis(200)).await;
}
