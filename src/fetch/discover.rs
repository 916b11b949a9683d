use crate::config::HarvestConfig;
use crate::error::{Error, FetchCause, Result};
use crate::filter::ImageFilter;
use crate::parsers::Parser;
use crate::resolve;
use crate::results::{ImageSet, PageImages};
use reqwest::Client;
use url::Url;

/// Fetches a page and returns the images it references.
///
/// The page URL is validated before any request is made. Exactly one GET is
/// issued; a network failure or non-success status aborts discovery.
pub async fn discover(client: &Client, page_url: &str, config: &HarvestConfig) -> Result<PageImages> {
    let page = resolve::parse_page_url(page_url)?;
    let filter = ImageFilter::new(&config.filter)?;
    let origin = resolve::origin_of(&page)
        .ok_or_else(|| Error::InvalidInput(format!("{}: page has no origin", page_url)))?;

    ::log::info!("Discovering images on {}", page);
    let html = fetch_page(client, &page).await?;

    let parsed = Parser::parse(&html);
    let images = collect_images(&parsed.sources, &origin, &filter, config.max_images);

    ::log::info!(
        "Found {} images ({} image elements) on {}",
        images.len(),
        parsed.sources.len(),
        page
    );

    Ok(PageImages {
        url: page.to_string(),
        title: parsed.title,
        images,
    })
}

/// Resolves raw sources against the page origin into an ordered, de-duplicated set
pub fn collect_images(
    sources: &[String],
    origin: &Url,
    filter: &ImageFilter,
    max_images: Option<usize>,
) -> ImageSet {
    let mut images = ImageSet::new();

    for raw in sources {
        let Some(reference) = resolve::resolve_reference(raw, origin) else {
            ::log::debug!("Dropping unresolvable image source: {:?}", raw);
            continue;
        };

        if !filter.accepts(reference.url()) {
            ::log::debug!("Image filter rejected: {}", reference.resolved);
            continue;
        }

        images.insert(reference);
    }

    if let Some(max) = max_images {
        if images.len() > max {
            ::log::info!("Keeping the first {} of {} images", max, images.len());
            images.truncate(max);
        }
    }

    images
}

async fn fetch_page(client: &Client, page: &Url) -> Result<String> {
    let fail = |cause: FetchCause| {
        ::log::error!("Failed to fetch page {}: {}", page, cause);
        Error::fetch_failed(page.as_str(), cause)
    };

    let response = client
        .get(page.clone())
        .send()
        .await
        .map_err(|e| fail(FetchCause::from_reqwest(&e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fail(FetchCause::Status(status.as_u16())));
    }

    response
        .text()
        .await
        .map_err(|e| fail(FetchCause::from_reqwest(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ImageFilterConfig;

    fn sources(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn site_origin() -> Url {
        resolve::origin_of(&Url::parse("https://site.com/blog/post").unwrap()).unwrap()
    }

    #[test]
    fn test_collect_resolves_and_dedups() {
        let raw = sources(&[
            "/img/a.png",
            "https://cdn.other.com/x.jpg",
            "/img/a.png",
            "img/a.png",
            "//cdn.other.com/x.jpg",
            "",
            "data:image/gif;base64,R0lGODlhAQABAAAAACw=",
        ]);

        let images = collect_images(&raw, &site_origin(), &ImageFilter::default(), None);
        assert_eq!(
            images.urls(),
            vec!["https://site.com/img/a.png", "https://cdn.other.com/x.jpg"]
        );
    }

    #[test]
    fn test_duplicates_by_resolution_path_are_kept() {
        // Same image, different strings: only exact matches collapse
        let raw = sources(&["https://site.com/img/a.png", "https://site.com/img/./a.png?"]);
        let images = collect_images(&raw, &site_origin(), &ImageFilter::default(), None);
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_collect_applies_filter_and_cap() {
        let raw = sources(&["/a.png", "/b.svg", "/c.png", "/d.png"]);
        let filter = ImageFilter::new(&ImageFilterConfig {
            include_patterns: vec![],
            exclude_patterns: vec![r"\.svg$".to_string()],
        })
        .unwrap();

        let images = collect_images(&raw, &site_origin(), &filter, Some(2));
        assert_eq!(
            images.urls(),
            vec!["https://site.com/a.png", "https://site.com/c.png"]
        );
    }

    #[test]
    fn test_raw_value_is_kept() {
        let raw = sources(&[" /img/a.png "]);
        let images = collect_images(&raw, &site_origin(), &ImageFilter::default(), None);
        let reference = images.iter().next().unwrap();
        assert_eq!(reference.raw, " /img/a.png ");
        assert_eq!(reference.resolved, "https://site.com/img/a.png");
    }
}
