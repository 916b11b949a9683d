use crate::config::HarvestConfig;
use crate::error::{Error, FetchCause, Result};
use crate::resolve;
use crate::results::FetchedImage;
use crate::utils::file_name_from_url;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

/// Content type reported when the server does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fetches one already-resolved image URL.
///
/// Issues a single GET with no retry. Non-success statuses, network errors
/// and timeouts all surface as `Error::FetchFailed` carrying the URL.
pub async fn fetch_one(client: &Client, url: &str, config: &HarvestConfig) -> Result<FetchedImage> {
    let parsed = resolve::parse_image_url(url)?;
    fetch_parsed(client, parsed, config)
        .await
        .map(|(content_type, bytes)| FetchedImage {
            url: url.to_string(),
            content_type,
            bytes,
            file_name: file_name_from_url(url, &config.fallback_file_name),
        })
        .map_err(|cause| {
            ::log::warn!("Failed to fetch {}: {}", url, cause);
            Error::fetch_failed(url, cause)
        })
}

async fn fetch_parsed(
    client: &Client,
    url: Url,
    config: &HarvestConfig,
) -> std::result::Result<(String, Vec<u8>), FetchCause> {
    ::log::debug!("FETCH: {}", url);
    let start = std::time::Instant::now();

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchCause::from_reqwest(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchCause::Status(status.as_u16()));
    }

    let content_type = declared_content_type(response.headers());
    if config.require_image_content_type && !is_image_content_type(&content_type) {
        return Err(FetchCause::NotAnImage(content_type));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchCause::from_reqwest(&e))?;

    ::log::debug!(
        "Fetched {} ({} bytes, {}) in {:.2} seconds",
        url,
        bytes.len(),
        content_type,
        start.elapsed().as_secs_f64()
    );

    Ok((content_type, bytes.to_vec()))
}

/// Content-Type header value, or the octet-stream default
pub fn declared_content_type(headers: &reqwest::header::HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

/// True for `image/*` media types, ignoring parameters and case
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}
