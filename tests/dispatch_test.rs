//! Integration tests for the click dispatch loop.
//!
//! These tests verify the cooperative model: registration waits for the
//! page-ready signal, clicks are handled strictly in arrival order on one
//! consumer, and closing the channel ends the run with an accurate summary.

use std::sync::Arc;

use dltrack::dispatch::{ClickDispatcher, DispatchError, DispatchSummary};
use dltrack::dom::{Document, ElementId};
use dltrack::selector::{Selector, DEFAULT_SELECTOR};
use dltrack::tracker::MemoryTracker;

// =============================================================================
// Test Helpers
// =============================================================================

/// Builds a downloads page with one versioned link per given version.
fn page_with_versions(versions: &[&str]) -> (Arc<Document>, Vec<ElementId>) {
    let mut document = Document::new("https://releases.example.com/").unwrap();
    let root = document.root();
    let downloads = document.append_child(root, "div", &["downloads"]).unwrap();

    let mut links = Vec::new();
    for version in versions {
        let button = document.append_child(downloads, "div", &["download"]).unwrap();
        let href = format!("terraform/{version}/pkg.zip");
        links.push(document.append_anchor(button, &href, &[]).unwrap());
    }
    (Arc::new(document), links)
}

fn default_selector() -> Selector {
    Selector::parse(DEFAULT_SELECTOR).unwrap()
}

// =============================================================================
// Dispatch Tests
// =============================================================================

/// Clicks are handled in arrival order.
#[tokio::test]
async fn test_clicks_handled_in_order() {
    let (document, links) = page_with_versions(&["1.0.0", "2.0.0", "3.0.0"]);
    let tracker = Arc::new(MemoryTracker::new());
    let (dispatcher, mut handle) = ClickDispatcher::new(16);

    let task = tokio::spawn(dispatcher.run(
        document,
        default_selector(),
        "Terraform".to_string(),
        tracker.clone(),
    ));

    handle.page_ready().unwrap();
    // Click in reverse order; the labels must come out in that same order.
    for link in links.iter().rev() {
        handle.click(*link).await.unwrap();
    }
    drop(handle);

    let summary = task.await.unwrap().unwrap();
    assert_eq!(summary.tracked, 3);

    let labels: Vec<String> = tracker.events().into_iter().map(|e| e.label).collect();
    assert_eq!(
        labels,
        vec![
            "Terraform | v3.0.0".to_string(),
            "Terraform | v2.0.0".to_string(),
            "Terraform | v1.0.0".to_string(),
        ]
    );
}

/// Clicks sent before page-ready queue up and are handled after binding.
#[tokio::test]
async fn test_clicks_before_ready_are_buffered() {
    let (document, links) = page_with_versions(&["1.5.7"]);
    let tracker = Arc::new(MemoryTracker::new());
    let (dispatcher, mut handle) = ClickDispatcher::new(16);

    let task = tokio::spawn(dispatcher.run(
        document,
        default_selector(),
        "Terraform".to_string(),
        tracker.clone(),
    ));

    // Click lands in the channel before the ready signal fires.
    handle.click(links[0]).await.unwrap();
    handle.page_ready().unwrap();
    drop(handle);

    let summary = task.await.unwrap().unwrap();
    assert_eq!(summary.tracked, 1);
    assert_eq!(tracker.events()[0].label, "Terraform | v1.5.7");
}

/// A dropped ready sender fails the run instead of hanging it.
#[tokio::test]
async fn test_dropped_ready_signal_fails_fast() {
    let (document, _) = page_with_versions(&["1.0.0"]);
    let (dispatcher, handle) = ClickDispatcher::new(4);
    drop(handle);

    let result = dispatcher
        .run(
            document,
            default_selector(),
            "Terraform".to_string(),
            Arc::new(MemoryTracker::new()),
        )
        .await;
    assert!(matches!(result, Err(DispatchError::ReadyDropped)));
}

/// Cloned click senders keep the loop alive until the last one drops.
#[tokio::test]
async fn test_cloned_sender_keeps_loop_alive() {
    let (document, links) = page_with_versions(&["1.0.0"]);
    let tracker = Arc::new(MemoryTracker::new());
    let (dispatcher, mut handle) = ClickDispatcher::new(4);

    let task = tokio::spawn(dispatcher.run(
        document,
        default_selector(),
        "Terraform".to_string(),
        tracker.clone(),
    ));

    handle.page_ready().unwrap();
    let extra_sender = handle.click_sender();
    drop(handle);

    // The loop is still running; the cloned sender can deliver.
    extra_sender.send(links[0]).await.unwrap();
    drop(extra_sender);

    let summary = task.await.unwrap().unwrap();
    assert_eq!(summary.tracked, 1);
}

/// The summary distinguishes tracked, no-version, and unbound clicks.
#[tokio::test]
async fn test_summary_is_accurate() {
    let mut document = Document::new("https://releases.example.com/").unwrap();
    let root = document.root();
    let downloads = document.append_child(root, "div", &["downloads"]).unwrap();
    let button = document.append_child(downloads, "div", &["download"]).unwrap();
    let versioned = document
        .append_anchor(button, "terraform/1.5.7/pkg.zip", &[])
        .unwrap();
    let unversioned = document
        .append_anchor(button, "latest/terraform.zip", &[])
        .unwrap();
    let stray = document
        .append_anchor(root, "terraform/9.9.9/pkg.zip", &[])
        .unwrap();
    let document = Arc::new(document);

    let tracker = Arc::new(MemoryTracker::new());
    let (dispatcher, mut handle) = ClickDispatcher::new(8);
    let task = tokio::spawn(dispatcher.run(
        document,
        default_selector(),
        "Terraform".to_string(),
        tracker.clone(),
    ));

    handle.page_ready().unwrap();
    handle.click(versioned).await.unwrap();
    handle.click(versioned).await.unwrap();
    handle.click(unversioned).await.unwrap();
    handle.click(stray).await.unwrap();
    drop(handle);

    let summary = task.await.unwrap().unwrap();
    assert_eq!(
        summary,
        DispatchSummary {
            tracked: 2,
            no_version: 1,
            unbound: 1,
        }
    );
    assert_eq!(tracker.len(), 2);
}
