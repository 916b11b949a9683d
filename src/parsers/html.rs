use crate::parsers::ParseResult;
use scraper::{Html, Selector};

const IMAGE_SELECTOR: &str = "img[src]";
const TITLE_SELECTOR: &str = "title";

/// Parses HTML content to extract the page title and image sources
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    let title = extract_title(&doc);
    let sources = extract_sources(&doc);

    ::log::debug!("HTML parser found {} image sources", sources.len());
    if !sources.is_empty() {
        ::log::trace!(
            "First few sources: {:?}",
            sources.iter().take(5).collect::<Vec<_>>()
        );
    }

    ParseResult::new(title, sources)
}

fn extract_sources(doc: &Html) -> Vec<String> {
    let Some(selector) = selector(IMAGE_SELECTOR) else {
        return Vec::new();
    };

    doc.select(&selector)
        .filter_map(|e| e.value().attr("src"))
        .map(|s| s.to_string())
        .collect()
}

fn extract_title(doc: &Html) -> Option<String> {
    let selector = selector(TITLE_SELECTOR)?;
    let title = doc
        .select(&selector)
        .next()?
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    (!title.is_empty()).then_some(title)
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            ::log::error!("Invalid selector {}: {:?}", css, e);
            None
        }
    }
}
