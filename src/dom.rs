//! Static document snapshot for click tracking.
//!
//! The host application describes the part of its page that holds download
//! links as a tree of elements with a tag, CSS classes, and (for anchors) an
//! `href`. The snapshot is built once before initialization and never mutated
//! afterwards; elements added to the real page later are deliberately not
//! covered.
//!
//! Anchor targets are resolved against the document's base URL with the
//! [`url`] crate, so relative hrefs behave the way a browser would resolve
//! them.
//!
//! # Example
//!
//! ```
//! use dltrack::dom::Document;
//!
//! let mut doc = Document::new("https://releases.example.com/").unwrap();
//! let root = doc.root();
//! let downloads = doc.append_child(root, "div", &["downloads"]).unwrap();
//! let button = doc.append_child(downloads, "div", &["download"]).unwrap();
//! let link = doc
//!     .append_anchor(button, "terraform/1.5.7/terraform_1.5.7_linux_amd64.zip", &[])
//!     .unwrap();
//!
//! let resolved = doc.resolved_href(link).unwrap();
//! assert_eq!(
//!     resolved.as_str(),
//!     "https://releases.example.com/terraform/1.5.7/terraform_1.5.7_linux_amd64.zip"
//! );
//! ```

use thiserror::Error;
use url::Url;

/// Tag used for the implicit root element.
const ROOT_TAG: &str = "body";

/// Errors that can occur while building or querying a document.
#[derive(Error, Debug)]
pub enum DomError {
    /// The base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// An element id does not belong to this document.
    #[error("unknown element id: {0:?}")]
    UnknownElement(ElementId),
}

/// Opaque handle to an element within a [`Document`].
///
/// Ids are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Internal element storage.
#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    href: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// An immutable-after-build snapshot of the page region holding download links.
///
/// Elements live in an arena indexed by [`ElementId`]; parent links support
/// the ancestor walks the selector matcher needs, child links support
/// document-order iteration.
#[derive(Debug, Clone)]
pub struct Document {
    base: Url,
    elements: Vec<ElementData>,
}

impl Document {
    /// Creates an empty document with the given base URL and an implicit
    /// `body` root element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// URL.
    pub fn new(base_url: &str) -> Result<Self, DomError> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            base,
            elements: vec![ElementData {
                tag: ROOT_TAG.to_string(),
                classes: Vec::new(),
                href: None,
                parent: None,
                children: Vec::new(),
            }],
        })
    }

    /// Returns the root element id.
    #[must_use]
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Returns the document's base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends a child element under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownElement`] if `parent` does not belong to
    /// this document.
    pub fn append_child(
        &mut self,
        parent: ElementId,
        tag: &str,
        classes: &[&str],
    ) -> Result<ElementId, DomError> {
        self.append(parent, tag, classes, None)
    }

    /// Appends an anchor (`a`) element with the given href under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownElement`] if `parent` does not belong to
    /// this document.
    pub fn append_anchor(
        &mut self,
        parent: ElementId,
        href: &str,
        classes: &[&str],
    ) -> Result<ElementId, DomError> {
        self.append(parent, "a", classes, Some(href.to_string()))
    }

    fn append(
        &mut self,
        parent: ElementId,
        tag: &str,
        classes: &[&str],
        href: Option<String>,
    ) -> Result<ElementId, DomError> {
        if parent.0 >= self.elements.len() {
            return Err(DomError::UnknownElement(parent));
        }

        let id = ElementId(self.elements.len());
        self.elements.push(ElementData {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
            href,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.elements[parent.0].children.push(id);
        Ok(id)
    }

    fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(id.0)
    }

    /// Returns the element's tag name, or `None` for a foreign id.
    #[must_use]
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.tag.as_str())
    }

    /// Returns the element's CSS classes, or `None` for a foreign id.
    #[must_use]
    pub fn classes(&self, id: ElementId) -> Option<&[String]> {
        self.get(id).map(|e| e.classes.as_slice())
    }

    /// Returns the element's raw `href` attribute, if any.
    #[must_use]
    pub fn href(&self, id: ElementId) -> Option<&str> {
        self.get(id).and_then(|e| e.href.as_deref())
    }

    /// Returns the element's parent, or `None` for the root or a foreign id.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Resolves the element's `href` against the document base URL.
    ///
    /// Returns `None` when the element has no `href` or the value cannot be
    /// joined against the base.
    #[must_use]
    pub fn resolved_href(&self, id: ElementId) -> Option<Url> {
        let href = self.href(id)?;
        self.base.join(href).ok()
    }

    /// Iterates over every element in document order (depth-first), root
    /// included.
    pub fn descendants(&self) -> impl Iterator<Item = ElementId> + '_ {
        DescendantIter {
            doc: self,
            stack: vec![self.root()],
        }
    }

    /// Iterates over the element's ancestors, nearest first, root last.
    ///
    /// Yields nothing for the root element or a foreign id.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        AncestorIter {
            doc: self,
            current: self.parent(id),
        }
    }

    /// Returns the number of elements in the document, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the document holds only the root element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.len() == 1
    }
}

struct DescendantIter<'a> {
    doc: &'a Document,
    stack: Vec<ElementId>,
}

impl Iterator for DescendantIter<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(data) = self.doc.get(id) {
            // Push in reverse so children come out in insertion order.
            for child in data.children.iter().rev() {
                self.stack.push(*child);
            }
        }
        Some(id)
    }
}

struct AncestorIter<'a> {
    doc: &'a Document,
    current: Option<ElementId>,
}

impl Iterator for AncestorIter<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.doc.parent(id);
        Some(id)
    }
}
