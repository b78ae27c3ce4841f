//! Version extraction from download URLs.
//!
//! Release archives live under a path segment of the form `/X.Y.Z/`, for
//! example `https://releases.example.com/terraform/1.5.7/terraform_1.5.7_linux_amd64.zip`.
//! The extractor takes the first such segment and returns the dotted triple,
//! or `None` when the URL has no versioned segment. Callers must handle the
//! `None` branch; a missing version is expected for unversioned paths such as
//! `/latest/`.

use regex::Regex;

/// Pattern for a versioned path segment. The surrounding slashes are part of
/// the contract: a bare `1.5.7` elsewhere in the URL does not count.
const VERSION_PATTERN: &str = r"/(\d+\.\d+\.\d+)/";

/// Extracts dotted-triple versions from URL paths.
///
/// Compiles the pattern once at construction; clone freely, [`Regex`] is
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct VersionExtractor {
    pattern: Regex,
}

impl VersionExtractor {
    /// Creates an extractor with the standard `/X.Y.Z/` pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(VERSION_PATTERN).expect("version pattern is valid"),
        }
    }

    /// Returns the first versioned path segment in `url`, without slashes.
    ///
    /// # Examples
    ///
    /// ```
    /// use dltrack::version::VersionExtractor;
    ///
    /// let extractor = VersionExtractor::new();
    /// assert_eq!(
    ///     extractor.extract("https://releases.example.com/terraform/1.5.7/file.zip"),
    ///     Some("1.5.7")
    /// );
    /// assert_eq!(
    ///     extractor.extract("https://releases.example.com/latest/file.zip"),
    ///     None
    /// );
    /// ```
    #[must_use]
    pub fn extract<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl Default for VersionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
