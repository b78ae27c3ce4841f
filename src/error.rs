//! Error types for the download tracker.
//!
//! Each module defines its own error enum; this module aggregates them into
//! the crate-level [`TrackError`] with clear, human-readable messages.

use thiserror::Error;

use crate::config::ConfigError;
use crate::dispatch::DispatchError;
use crate::dom::DomError;
use crate::selector::SelectorError;
use crate::sender::HttpTrackerError;

/// Errors that can occur during tracker operations.
///
/// This is the primary error type for the crate, encompassing all failure
/// modes of setup and dispatch. Delivery failures on the click path never
/// surface here; they are logged and dropped by design.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Selector parsing error.
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    /// Document construction or lookup error.
    #[error("document error: {0}")]
    Dom(#[from] DomError),

    /// Dispatch loop error.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// HTTP delivery error, from explicit [`crate::sender::HttpTracker::deliver`] calls.
    #[error("delivery error: {0}")]
    Delivery(#[from] HttpTrackerError),
}

/// A specialized `Result` type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackError>;
