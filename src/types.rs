//! Event types for download-click tracking.
//!
//! This module defines the wire record handed to the tracking dependency.
//! The field names and the two constant values are part of the downstream
//! analytics contract and must not change.

use serde::{Deserialize, Serialize};

/// Event name for every download click.
pub const DOWNLOAD_EVENT: &str = "Download";

/// Category for every download click.
pub const BUTTON_CATEGORY: &str = "Button";

/// Default product name used in labels.
pub const DEFAULT_PRODUCT: &str = "Terraform";

/// A single tracking record.
///
/// Constructed at click time, forwarded to the tracker, and discarded. The
/// record carries no identity and no timestamp; the serialized shape is
/// exactly `{"event": ..., "category": ..., "label": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEvent {
    /// Event name, always [`DOWNLOAD_EVENT`].
    pub event: String,

    /// Event category, always [`BUTTON_CATEGORY`].
    pub category: String,

    /// Human-readable label, `"<product> | v<version>"`.
    pub label: String,
}

impl TrackedEvent {
    /// Creates a download record with the given label.
    ///
    /// # Examples
    ///
    /// ```
    /// use dltrack::types::{TrackedEvent, download_label};
    ///
    /// let event = TrackedEvent::download(download_label("Terraform", "1.5.7"));
    /// assert_eq!(event.event, "Download");
    /// assert_eq!(event.category, "Button");
    /// assert_eq!(event.label, "Terraform | v1.5.7");
    /// ```
    #[must_use]
    pub fn download(label: String) -> Self {
        Self {
            event: DOWNLOAD_EVENT.to_string(),
            category: BUTTON_CATEGORY.to_string(),
            label,
        }
    }
}

/// Builds the label for a download record.
#[must_use]
pub fn download_label(product: &str, version: &str) -> String {
    format!("{product} | v{version}")
}
