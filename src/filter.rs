use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Regex patterns deciding which discovered image URLs are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageFilterConfig {
    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Filter applied to resolved image URLs during discovery
#[derive(Debug, Default)]
pub struct ImageFilter {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl ImageFilter {
    /// Create a new image filter from configuration
    pub fn new(config: &ImageFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a resolved image URL should be kept
    pub fn accepts(&self, url: &Url) -> bool {
        // Only http(s) can be retrieved later
        if !is_fetchable_scheme(url) {
            return false;
        }

        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|re| re.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|re| re.is_match(url_str))
    }
}

/// True for http and https URLs
pub fn is_fetchable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
