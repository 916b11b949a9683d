use crate::error::{Error, FetchCause};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// One image reference found in page markup
#[derive(Debug, Clone, Serialize)]
pub struct ImageReference {
    /// Attribute value as it appeared in the markup
    pub raw: String,

    /// Absolute form of the reference
    pub resolved: String,

    #[serde(skip)]
    url: Url,
}

impl ImageReference {
    pub(crate) fn new(raw: &str, resolved: String, url: Url) -> Self {
        Self {
            raw: raw.to_string(),
            resolved,
            url,
        }
    }

    /// Parsed form of `resolved`
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Ordered, de-duplicated image references from one page
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ImageSet {
    references: Vec<ImageReference>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reference unless an identical resolved string is already present
    pub fn insert(&mut self, reference: ImageReference) -> bool {
        if !self.seen.insert(reference.resolved.clone()) {
            ::log::trace!("Skipping duplicate image: {}", reference.resolved);
            return false;
        }
        self.references.push(reference);
        true
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageReference> {
        self.references.iter()
    }

    /// Resolved URLs in document order
    pub fn urls(&self) -> Vec<String> {
        self.references.iter().map(|r| r.resolved.clone()).collect()
    }

    /// Keep only the first `max` references
    pub fn truncate(&mut self, max: usize) {
        for dropped in self.references.drain(max.min(self.references.len())..) {
            self.seen.remove(&dropped.resolved);
        }
    }
}

impl<'a> IntoIterator for &'a ImageSet {
    type Item = &'a ImageReference;
    type IntoIter = std::slice::Iter<'a, ImageReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.iter()
    }
}

/// Images discovered on a single page
#[derive(Debug, Clone, Serialize)]
pub struct PageImages {
    /// URL of the page
    pub url: String,

    /// Title of the page (if available)
    pub title: Option<String>,

    /// Images in document order
    pub images: ImageSet,
}

/// A successfully retrieved image
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// URL the image was fetched from
    pub url: String,

    /// Content type declared by the server, or `application/octet-stream`
    pub content_type: String,

    /// Full response body
    pub bytes: Vec<u8>,

    /// File name derived from the URL's last path segment
    pub file_name: String,
}

/// An image URL that could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUrl {
    pub url: String,
    pub cause: FetchCause,
}

impl FailedUrl {
    /// Turn a single-fetch error into a per-URL failure entry
    pub fn from_error(url: String, error: Error) -> Self {
        let cause = match error {
            Error::FetchFailed { cause, .. } => cause,
            Error::InvalidInput(msg) => FetchCause::InvalidUrl(msg),
            other => FetchCause::Network(other.to_string()),
        };
        Self { url, cause }
    }
}

/// Outcome of retrieving one URL within a batch
pub type RetrievalResult = std::result::Result<FetchedImage, FailedUrl>;

/// Overall outcome of a batch retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Nothing was requested
    Empty,
    /// Every URL was retrieved
    Complete,
    /// Some URLs failed; the archive holds the rest
    Partial,
    /// Every URL failed; the archive is empty
    AllFailed,
}

/// A serialized archive and the URLs that did not make it in
#[derive(Debug, Clone)]
pub struct ArchiveOutput {
    /// Suggested file name for the archive
    pub name: String,

    /// Serialized zip bytes
    pub bytes: Vec<u8>,

    /// Entry names written to the archive, in input order
    pub entries: Vec<String>,

    /// Failed URLs with their causes, in input order
    pub failures: Vec<FailedUrl>,
}

impl ArchiveOutput {
    pub fn status(&self) -> BatchStatus {
        match (self.entries.is_empty(), self.failures.is_empty()) {
            (true, true) => BatchStatus::Empty,
            (false, true) => BatchStatus::Complete,
            (false, false) => BatchStatus::Partial,
            (true, false) => BatchStatus::AllFailed,
        }
    }
}
