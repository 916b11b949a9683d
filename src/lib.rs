// Re-export modules
pub mod archive;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod parsers;
pub mod resolve;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use archive::ARCHIVE_CONTENT_TYPE;
pub use config::HarvestConfig;
pub use error::{Error, FetchCause, Result};
pub use results::{
    ArchiveOutput, BatchStatus, FailedUrl, FetchedImage, ImageReference, ImageSet, PageImages,
};

use std::future::Future;
use std::time::Duration;

/// Entry point for discovering and retrieving the images of a page.
///
/// Holds configuration only. Every call builds its own HTTP client, so two
/// calls never share connections or state.
#[derive(Debug, Clone)]
pub struct Harvester {
    config: HarvestConfig,
}

impl Default for Harvester {
    fn default() -> Self {
        Self::new()
    }
}

impl Harvester {
    /// Create a new Harvester with default configuration
    pub fn new() -> Self {
        Self {
            config: HarvestConfig::default().apply_env(),
        }
    }

    /// Set the maximum number of concurrent image requests
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set the timeout for each individual request
    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = timeout_seconds;
        self
    }

    /// Set the deadline for a whole batch retrieval
    pub fn with_batch_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.batch_timeout_secs = Some(timeout_seconds);
        self
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config.apply_env();
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self> {
        let config = HarvestConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Fetch a page and list the images it references
    pub async fn discover(&self, page_url: &str) -> Result<PageImages> {
        let client = fetch::client::build_client(&self.config)?;
        fetch::discover::discover(&client, page_url, &self.config).await
    }

    /// Fetch one already-resolved image URL
    pub async fn fetch_one(&self, url: &str) -> Result<FetchedImage> {
        let client = fetch::client::build_client(&self.config)?;
        fetch::retrieve::fetch_one(&client, url, &self.config).await
    }

    /// Fetch one image for an individual download
    pub async fn fetch_for_download(&self, url: &str) -> Result<FetchedImage> {
        ::log::info!("Downloading single image: {}", url);
        self.fetch_one(url).await
    }

    /// Fetch the given URLs and package the successes into an archive
    pub async fn build_archive<I, S>(&self, urls: I) -> Result<ArchiveOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_archive_until(urls, std::future::pending::<()>())
            .await
    }

    /// Like `build_archive`, but stops early when `signal` completes.
    ///
    /// The configured batch deadline, if any, also applies.
    pub async fn build_archive_until<I, S, F>(&self, urls: I, signal: F) -> Result<ArchiveOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Future<Output = ()>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        let client = fetch::client::build_client(&self.config)?;
        let cancel = cancel_signal(signal, self.config.batch_timeout());

        fetch::batch::build_archive(&client, &urls, &self.config, cancel).await
    }
}

/// Completes when either the caller's signal or the batch deadline does
async fn cancel_signal<F>(signal: F, deadline: Option<Duration>)
where
    F: Future<Output = ()>,
{
    let deadline = async move {
        match deadline {
            Some(duration) => {
                tokio::time::sleep(duration).await;
                ::log::warn!("Batch deadline of {:?} elapsed", duration);
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = signal => {}
        _ = deadline => {}
    }
}
