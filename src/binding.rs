//! Download-click binding.
//!
//! [`init_download_tracking`] is the explicit initialization the host calls
//! once its page-ready signal has fired: it scans the document snapshot for
//! elements matching the download selector and binds each one exactly once.
//! [`DownloadTracking::handle_click`] then turns a click on a bound element
//! into one tracking call, recomputing the resolved URL, version, and label
//! on every click.
//!
//! Clicks on elements that never matched the selector are ignored, and a
//! click whose URL carries no `/X.Y.Z/` segment suppresses the tracking call
//! with a warning instead of producing a malformed label.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use dltrack::binding::{init_download_tracking, ClickOutcome};
//! use dltrack::dom::Document;
//! use dltrack::selector::{Selector, DEFAULT_SELECTOR};
//! use dltrack::tracker::MemoryTracker;
//!
//! let mut doc = Document::new("https://releases.example.com/").unwrap();
//! let root = doc.root();
//! let downloads = doc.append_child(root, "div", &["downloads"]).unwrap();
//! let button = doc.append_child(downloads, "div", &["download"]).unwrap();
//! let link = doc.append_anchor(button, "terraform/1.5.7/pkg.zip", &[]).unwrap();
//!
//! let tracker = Arc::new(MemoryTracker::new());
//! let selector = Selector::parse(DEFAULT_SELECTOR).unwrap();
//! let tracking =
//!     init_download_tracking(Arc::new(doc), &selector, "Terraform", tracker.clone());
//!
//! assert_eq!(tracking.handle_click(link), ClickOutcome::Tracked);
//! assert_eq!(tracker.events()[0].label, "Terraform | v1.5.7");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::dom::{Document, ElementId};
use crate::error::TrackError;
use crate::selector::Selector;
use crate::tracker::Tracker;
use crate::types::{download_label, TrackedEvent};
use crate::version::VersionExtractor;

/// What happened to a single click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A record was forwarded to the tracker.
    Tracked,

    /// The element's URL had no versioned segment (or no resolvable URL);
    /// the tracking call was suppressed.
    NoVersion,

    /// The element was never bound; nothing happened.
    Unbound,
}

/// Active click bindings over one document snapshot.
pub struct DownloadTracking {
    document: Arc<Document>,
    bound: HashSet<ElementId>,
    extractor: VersionExtractor,
    product: String,
    tracker: Arc<dyn Tracker>,
}

/// Binds every element currently matching `selector` in `document`.
///
/// Each qualifying element is bound exactly once; elements added to the real
/// page after this call are not covered.
#[must_use]
pub fn init_download_tracking(
    document: Arc<Document>,
    selector: &Selector,
    product: &str,
    tracker: Arc<dyn Tracker>,
) -> DownloadTracking {
    let bound: HashSet<ElementId> = document
        .descendants()
        .filter(|id| selector.matches(&document, *id))
        .collect();

    debug!(bound = bound.len(), "Initialized download tracking");

    DownloadTracking {
        document,
        bound,
        extractor: VersionExtractor::new(),
        product: product.to_string(),
        tracker,
    }
}

impl DownloadTracking {
    /// Binds using the selector and product from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Selector`] if the configured selector string
    /// does not parse.
    pub fn from_config(
        document: Arc<Document>,
        config: &Config,
        tracker: Arc<dyn Tracker>,
    ) -> Result<Self, TrackError> {
        let selector = Selector::parse(&config.selector)?;
        Ok(init_download_tracking(
            document,
            &selector,
            &config.product,
            tracker,
        ))
    }

    /// Returns the number of bound elements.
    #[must_use]
    pub fn bound_len(&self) -> usize {
        self.bound.len()
    }

    /// Returns true if `element` was bound at initialization.
    #[must_use]
    pub fn is_bound(&self, element: ElementId) -> bool {
        self.bound.contains(&element)
    }

    /// Handles one click on `element`.
    ///
    /// For a bound element this resolves the link target, extracts the
    /// version, and forwards one record to the tracker. Nothing is cached
    /// between clicks. Never panics: unbound elements and unversioned URLs
    /// return without a tracking call.
    pub fn handle_click(&self, element: ElementId) -> ClickOutcome {
        if !self.bound.contains(&element) {
            debug!(?element, "Click on unbound element ignored");
            return ClickOutcome::Unbound;
        }

        let Some(resolved) = self.document.resolved_href(element) else {
            warn!(?element, "Bound element has no resolvable URL, skipping");
            return ClickOutcome::NoVersion;
        };

        let url = resolved.as_str();
        let Some(version) = self.extractor.extract(url) else {
            warn!(url, "No version segment in download URL, skipping");
            return ClickOutcome::NoVersion;
        };

        let event = TrackedEvent::download(download_label(&self.product, version));
        debug!(url, label = %event.label, "Tracking download click");
        self.tracker.track(event);
        ClickOutcome::Tracked
    }
}
