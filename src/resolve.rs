//! Turning raw `src` attribute values into absolute image URLs.
//!
//! Relative references are joined onto the page's origin (scheme, host and
//! port) rather than onto the page's own path, so `img/a.png` found on
//! `https://site.com/blog/post` becomes `https://site.com/img/a.png`.

use crate::error::{Error, Result};
use crate::filter::is_fetchable_scheme;
use crate::results::ImageReference;
use url::Url;

/// Parse a user-supplied page URL, requiring an absolute http(s) URL
pub fn parse_page_url(page_url: &str) -> Result<Url> {
    let trimmed = page_url.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| Error::InvalidInput(format!("{}: {}", page_url, e)))?;

    if !is_fetchable_scheme(&url) || !url.has_host() {
        return Err(Error::InvalidInput(format!(
            "{}: expected an absolute http or https URL",
            page_url
        )));
    }

    Ok(url)
}

/// Parse an already-resolved image URL; no relative resolution happens here
pub fn parse_image_url(image_url: &str) -> Result<Url> {
    // Same constraint as a page URL
    parse_page_url(image_url)
}

/// The origin of a page as a URL with path `/`
pub fn origin_of(page: &Url) -> Option<Url> {
    let origin = page.origin();
    if !origin.is_tuple() {
        return None;
    }
    Url::parse(&origin.ascii_serialization()).ok()
}

/// Resolve one raw reference against the page origin.
///
/// A reference that already carries an http(s) scheme keeps its exact
/// string as long as it parses. Returns `None` when the reference cannot be
/// turned into an absolute URL.
pub fn resolve_reference(raw: &str, origin: &Url) -> Option<ImageReference> {
    // HTML attribute values may carry surrounding whitespace
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return None;
    }

    if has_http_scheme(trimmed) {
        let url = Url::parse(trimmed).ok()?;
        return Some(ImageReference::new(raw, trimmed.to_string(), url));
    }

    let url = origin.join(trimmed).ok()?;
    Some(ImageReference::new(raw, url.to_string(), url))
}

/// Case-insensitive check for an explicit `http://` or `https://` prefix
fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
