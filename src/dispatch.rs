//! Cooperative click dispatch loop.
//!
//! Everything runs on one consumer task, mirroring a page's UI event loop:
//! registration waits for a one-shot page-ready signal, then clicks are
//! handled strictly in arrival order with no overlap. The host holds a
//! [`DispatchHandle`] and feeds it from wherever its real events originate.
//!
//! The loop ends when every handle clone has been dropped, returning a
//! [`DispatchSummary`] of what happened.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use dltrack::dispatch::ClickDispatcher;
//! use dltrack::dom::Document;
//! use dltrack::selector::{Selector, DEFAULT_SELECTOR};
//! use dltrack::tracker::MemoryTracker;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut doc = Document::new("https://releases.example.com/").unwrap();
//! let root = doc.root();
//! let downloads = doc.append_child(root, "div", &["downloads"]).unwrap();
//! let button = doc.append_child(downloads, "div", &["download"]).unwrap();
//! let link = doc.append_anchor(button, "terraform/1.5.7/pkg.zip", &[]).unwrap();
//!
//! let tracker = Arc::new(MemoryTracker::new());
//! let selector = Selector::parse(DEFAULT_SELECTOR).unwrap();
//! let (dispatcher, mut handle) = ClickDispatcher::new(16);
//!
//! let task = tokio::spawn(dispatcher.run(
//!     Arc::new(doc),
//!     selector,
//!     "Terraform".to_string(),
//!     tracker.clone(),
//! ));
//!
//! handle.page_ready().unwrap();
//! handle.click(link).await.unwrap();
//! drop(handle);
//!
//! let summary = task.await.unwrap().unwrap();
//! assert_eq!(summary.tracked, 1);
//! assert_eq!(tracker.len(), 1);
//! # }
//! ```

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::binding::{init_download_tracking, ClickOutcome};
use crate::dom::{Document, ElementId};
use crate::selector::Selector;
use crate::tracker::Tracker;

/// Errors that can occur in the dispatch loop or its handle.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The page-ready sender was dropped without firing; registration can
    /// never happen.
    #[error("page-ready signal dropped before firing")]
    ReadyDropped,

    /// The page-ready signal was already fired or the dispatcher is gone.
    #[error("page-ready signal already consumed")]
    ReadyConsumed,

    /// The dispatcher ended before the click could be delivered.
    #[error("click channel closed")]
    ChannelClosed,
}

/// Counts of click outcomes observed by one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Clicks that produced a tracking call.
    pub tracked: usize,

    /// Clicks suppressed for lack of a version segment.
    pub no_version: usize,

    /// Clicks on elements outside the binding.
    pub unbound: usize,
}

/// Host-side handle feeding the dispatch loop.
///
/// Cloning shares the click channel; the page-ready signal stays with the
/// original handle.
#[derive(Debug)]
pub struct DispatchHandle {
    ready: Option<oneshot::Sender<()>>,
    clicks: mpsc::Sender<ElementId>,
}

impl DispatchHandle {
    /// Fires the one-shot page-ready signal.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ReadyConsumed`] if the signal was already
    /// fired from this handle or the dispatcher has been dropped.
    pub fn page_ready(&mut self) -> Result<(), DispatchError> {
        let sender = self.ready.take().ok_or(DispatchError::ReadyConsumed)?;
        sender.send(()).map_err(|()| DispatchError::ReadyConsumed)
    }

    /// Delivers one click, waiting for channel capacity if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ChannelClosed`] if the dispatch loop has
    /// ended.
    pub async fn click(&self, element: ElementId) -> Result<(), DispatchError> {
        self.clicks
            .send(element)
            .await
            .map_err(|_| DispatchError::ChannelClosed)
    }

    /// Returns a clone that can send clicks but not the ready signal.
    #[must_use]
    pub fn click_sender(&self) -> mpsc::Sender<ElementId> {
        self.clicks.clone()
    }
}

/// Single-consumer click dispatcher.
#[derive(Debug)]
pub struct ClickDispatcher {
    ready: oneshot::Receiver<()>,
    clicks: mpsc::Receiver<ElementId>,
}

impl ClickDispatcher {
    /// Creates a dispatcher and its host-side handle.
    ///
    /// `buffer` is the click channel capacity; clicks sent before the loop
    /// catches up (including any sent before page-ready) queue here and are
    /// handled in order.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, DispatchHandle) {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (click_tx, click_rx) = mpsc::channel(buffer);
        (
            Self {
                ready: ready_rx,
                clicks: click_rx,
            },
            DispatchHandle {
                ready: Some(ready_tx),
                clicks: click_tx,
            },
        )
    }

    /// Runs the loop: await page-ready, bind the download links, then handle
    /// clicks in arrival order until every click sender is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ReadyDropped`] if the page-ready sender is
    /// dropped without firing.
    pub async fn run(
        mut self,
        document: Arc<Document>,
        selector: Selector,
        product: String,
        tracker: Arc<dyn Tracker>,
    ) -> Result<DispatchSummary, DispatchError> {
        self.ready.await.map_err(|_| DispatchError::ReadyDropped)?;
        debug!("Page ready, binding download links");

        let tracking = init_download_tracking(document, &selector, &product, tracker);

        let mut summary = DispatchSummary::default();
        while let Some(element) = self.clicks.recv().await {
            match tracking.handle_click(element) {
                ClickOutcome::Tracked => summary.tracked += 1,
                ClickOutcome::NoVersion => summary.no_version += 1,
                ClickOutcome::Unbound => summary.unbound += 1,
            }
        }

        info!(
            tracked = summary.tracked,
            no_version = summary.no_version,
            unbound = summary.unbound,
            "Click dispatch finished"
        );
        Ok(summary)
    }
}
