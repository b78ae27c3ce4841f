//! HTTP tracking integration.
//!
//! [`HttpTracker`] posts each record as JSON to an analytics collector. The
//! [`Tracker`] impl is fire-and-forget: delivery runs on a spawned task,
//! failures are logged and never reach the click path, and there are no
//! retries. A failed tracking call must never interfere with the user's
//! download.
//!
//! # Example
//!
//! ```no_run
//! use dltrack::sender::{HttpTracker, HttpTrackerConfig};
//! use dltrack::tracker::Tracker;
//! use dltrack::types::{download_label, TrackedEvent};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = HttpTrackerConfig::new("https://analytics.example.com/collect".to_string());
//!     let tracker = HttpTracker::new(config);
//!
//!     tracker.track(TrackedEvent::download(download_label("Terraform", "1.5.7")));
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tracker::Tracker;
use crate::types::TrackedEvent;

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur during event delivery.
#[derive(Error, Debug)]
pub enum HttpTrackerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Collector returned a non-success status.
    #[error("collector error: {status} - {message}")]
    CollectorError { status: u16, message: String },
}

/// Configuration for the HTTP tracker.
#[derive(Debug, Clone)]
pub struct HttpTrackerConfig {
    /// Collector URL events are posted to.
    pub endpoint_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl HttpTrackerConfig {
    /// Creates a configuration with the default request timeout.
    #[must_use]
    pub fn new(endpoint_url: String) -> Self {
        Self {
            endpoint_url,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Fire-and-forget HTTP tracker.
#[derive(Debug, Clone)]
pub struct HttpTracker {
    config: HttpTrackerConfig,
    client: Client,
}

impl HttpTracker {
    /// Creates a tracker with a pooled HTTP client.
    #[must_use]
    pub fn new(config: HttpTrackerConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Delivers one event to the collector and waits for the response.
    ///
    /// Used by the spawned delivery task; also callable directly by hosts
    /// that want to observe delivery errors.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTrackerError::Http`] on a transport failure and
    /// [`HttpTrackerError::CollectorError`] on a non-2xx response.
    pub async fn deliver(&self, event: &TrackedEvent) -> Result<(), HttpTrackerError> {
        let response = self
            .client
            .post(&self.config.endpoint_url)
            .json(event)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HttpTrackerError::CollectorError {
                status: status.as_u16(),
                message,
            });
        }

        debug!(label = %event.label, "Delivered tracking event");
        Ok(())
    }
}

impl Tracker for HttpTracker {
    fn track(&self, event: TrackedEvent) {
        let tracker = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let _task = handle.spawn(async move {
                    if let Err(err) = tracker.deliver(&event).await {
                        warn!(label = %event.label, error = %err, "Tracking delivery failed");
                    }
                });
            }
            Err(_) => {
                warn!(
                    label = %event.label,
                    "No async runtime available, dropping tracking event"
                );
            }
        }
    }
}
