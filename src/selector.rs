//! Descendant selector parsing and matching.
//!
//! The selector grammar is the small subset the download binding needs:
//! whitespace-separated compound parts, each an optional tag name followed by
//! zero or more `.class` segments (`a`, `.downloads`, `a.download`). Parts
//! combine with descendant semantics, so `.downloads .download a` matches an
//! anchor anywhere below a `.download` element that is itself anywhere below
//! a `.downloads` element.

use thiserror::Error;

use crate::dom::{Document, ElementId};

/// Selector used when none is configured.
pub const DEFAULT_SELECTOR: &str = ".downloads .download a";

/// Errors that can occur while parsing a selector string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector string contains no parts.
    #[error("selector is empty")]
    Empty,

    /// A `.` with no class name after it.
    #[error("empty class name in selector part '{part}'")]
    EmptyClassName { part: String },

    /// A character outside the supported identifier set.
    #[error("invalid character '{character}' in selector part '{part}'")]
    InvalidCharacter { part: String, character: char },
}

/// One compound part: an optional tag plus required classes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectorPart {
    tag: Option<String>,
    classes: Vec<String>,
}

impl SelectorPart {
    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        if let Some(tag) = &self.tag {
            if doc.tag(id) != Some(tag.as_str()) {
                return false;
            }
        }
        let Some(classes) = doc.classes(id) else {
            return false;
        };
        self.classes
            .iter()
            .all(|wanted| classes.iter().any(|c| c == wanted))
    }
}

/// A parsed descendant selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<SelectorPart>,
}

impl Selector {
    /// Parses a selector string.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] for an empty selector, an empty class
    /// name, or a character outside `[A-Za-z0-9_-]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dltrack::selector::Selector;
    ///
    /// let selector = Selector::parse(".downloads .download a").unwrap();
    /// assert_eq!(selector.part_count(), 3);
    /// ```
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let parts: Vec<SelectorPart> = input
            .split_whitespace()
            .map(parse_part)
            .collect::<Result<_, _>>()?;

        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }

    /// Returns the number of compound parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if `id` matches this selector within `doc`.
    ///
    /// The rightmost part must match the element itself; each earlier part
    /// must match a strictly higher ancestor, preserving order.
    #[must_use]
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        let (last, rest) = self
            .parts
            .split_last()
            .expect("parsed selector has at least one part");

        if !last.matches(doc, id) {
            return false;
        }

        // Walk ancestors nearest-first, consuming the remaining parts
        // rightmost-first. Every part must find an ancestor.
        let mut remaining = rest.iter().rev();
        let mut wanted = remaining.next();
        for ancestor in doc.ancestors(id) {
            let Some(part) = wanted else {
                return true;
            };
            if part.matches(doc, ancestor) {
                wanted = remaining.next();
            }
        }
        wanted.is_none()
    }
}

fn parse_part(raw: &str) -> Result<SelectorPart, SelectorError> {
    let mut tag = None;
    let mut classes = Vec::new();

    for (i, segment) in raw.split('.').enumerate() {
        if i == 0 {
            if !segment.is_empty() {
                validate_ident(raw, segment)?;
                tag = Some(segment.to_string());
            }
            continue;
        }
        if segment.is_empty() {
            return Err(SelectorError::EmptyClassName {
                part: raw.to_string(),
            });
        }
        validate_ident(raw, segment)?;
        classes.push(segment.to_string());
    }

    Ok(SelectorPart { tag, classes })
}

fn validate_ident(part: &str, ident: &str) -> Result<(), SelectorError> {
    for character in ident.chars() {
        if !(character.is_ascii_alphanumeric() || character == '-' || character == '_') {
            return Err(SelectorError::InvalidCharacter {
                part: part.to_string(),
                character,
            });
        }
    }
    Ok(())
}
