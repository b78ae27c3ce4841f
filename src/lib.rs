//! dltrack - download-click analytics instrumentation.
//!
//! This crate wires clicks on versioned download links to an analytics
//! tracking call. The host application snapshots the page region holding its
//! download links, fires a page-ready signal, and feeds clicks through a
//! single-consumer dispatch loop; every click on a bound link produces one
//! `{event, category, label}` record whose label carries the version number
//! extracted from the link's URL.
//!
//! # Overview
//!
//! Binding is explicit and happens once: after page-ready,
//! [`init_download_tracking`] matches anchors against the
//! `.downloads .download a` selector and registers each exactly once.
//! Elements added afterwards are not covered. Each click recomputes its label
//! independently, and a URL with no `/X.Y.Z/` segment suppresses the call
//! instead of producing a malformed record.
//!
//! Tracking is fire-and-forget: a failed delivery is logged and must never
//! block or break the user's download.
//!
//! # Modules
//!
//! - [`types`]: The tracked-event wire record and its constants
//! - [`dom`]: Static document snapshot with base-URL href resolution
//! - [`selector`]: Descendant selector parsing and matching
//! - [`version`]: Version extraction from download URLs
//! - [`binding`]: Click binding and per-click handling
//! - [`dispatch`]: Page-ready gated, ordered click dispatch loop
//! - [`tracker`]: The external tracking seam
//! - [`sender`]: HTTP tracking integration
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for tracker operations

pub mod binding;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod selector;
pub mod sender;
pub mod tracker;
pub mod types;
pub mod version;

pub use binding::{init_download_tracking, ClickOutcome, DownloadTracking};
pub use config::{Config, ConfigError};
pub use dispatch::{ClickDispatcher, DispatchError, DispatchHandle, DispatchSummary};
pub use dom::{Document, DomError, ElementId};
pub use error::{Result, TrackError};
pub use selector::{Selector, SelectorError, DEFAULT_SELECTOR};
pub use sender::{HttpTracker, HttpTrackerConfig, HttpTrackerError};
pub use tracker::{MemoryTracker, Tracker};
pub use types::{download_label, TrackedEvent, BUTTON_CATEGORY, DOWNLOAD_EVENT};
pub use version::VersionExtractor;
