pub mod html;

#[cfg(test)]
mod tests;

/// Result of scanning a page for images
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Contents of the first `<title>` element, whitespace-normalized
    pub title: Option<String>,
    /// Raw `src` values of image elements, in document order
    pub sources: Vec<String>,
}

impl ParseResult {
    /// Creates a new parse result with the given title and image sources
    pub fn new(title: Option<String>, sources: Vec<String>) -> Self {
        Self { title, sources }
    }
}

/// Main parser entry point for page markup
pub struct Parser;

impl Parser {
    /// Parse an HTML document for its title and image sources
    pub fn parse(content: &str) -> ParseResult {
        html::parse(content)
    }
}
