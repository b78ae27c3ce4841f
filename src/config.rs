//! Configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `DLTRACK_ENDPOINT_URL` | Yes | - | Analytics collector URL |
//! | `DLTRACK_SELECTOR` | No | `.downloads .download a` | Download-link selector |
//! | `DLTRACK_PRODUCT` | No | `Terraform` | Product name used in labels |
//! | `DLTRACK_CLICK_BUFFER` | No | 64 | Click channel capacity |
//!
//! # Example
//!
//! ```no_run
//! use dltrack::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Collector: {}", config.endpoint_url);
//! ```

use std::env;

use thiserror::Error;

use crate::selector::{Selector, DEFAULT_SELECTOR};
use crate::types::DEFAULT_PRODUCT;

/// Default click channel capacity.
const DEFAULT_CLICK_BUFFER: usize = 64;

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for the download tracker.
#[derive(Debug, Clone)]
pub struct Config {
    /// Analytics collector URL events are posted to.
    pub endpoint_url: String,

    /// Selector for download links. Validated at parse time.
    pub selector: String,

    /// Product name used as the label prefix.
    pub product: String,

    /// Capacity of the click channel.
    pub click_buffer: usize,
}

impl Config {
    /// Creates a `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `DLTRACK_ENDPOINT_URL` is not set
    /// - `DLTRACK_SELECTOR` is set but does not parse
    /// - `DLTRACK_CLICK_BUFFER` is set but is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        // Required: DLTRACK_ENDPOINT_URL
        let endpoint_url = env::var("DLTRACK_ENDPOINT_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DLTRACK_ENDPOINT_URL".to_string()))?;

        // Optional: DLTRACK_SELECTOR (default: ".downloads .download a")
        let selector = match env::var("DLTRACK_SELECTOR") {
            Ok(val) => {
                Selector::parse(&val).map_err(|err| ConfigError::InvalidValue {
                    key: "DLTRACK_SELECTOR".to_string(),
                    message: err.to_string(),
                })?;
                val
            }
            Err(_) => DEFAULT_SELECTOR.to_string(),
        };

        // Optional: DLTRACK_PRODUCT (default: "Terraform")
        let product =
            env::var("DLTRACK_PRODUCT").unwrap_or_else(|_| DEFAULT_PRODUCT.to_string());

        // Optional: DLTRACK_CLICK_BUFFER (default: 64, must be > 0)
        let click_buffer = match env::var("DLTRACK_CLICK_BUFFER") {
            Ok(val) => {
                let size = val
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "DLTRACK_CLICK_BUFFER".to_string(),
                        message: format!("expected positive integer, got '{val}'"),
                    })?;
                if size == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "DLTRACK_CLICK_BUFFER".to_string(),
                        message: "click buffer must be greater than 0".to_string(),
                    });
                }
                size
            }
            Err(_) => DEFAULT_CLICK_BUFFER,
        };

        Ok(Self {
            endpoint_url,
            selector,
            product,
            click_buffer,
        })
    }
}
