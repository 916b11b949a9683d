use crate::error::Result;
use crate::filter::ImageFilterConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides the configured user agent
pub const USER_AGENT_ENV: &str = "YIELD_IMAGES_USER_AGENT";

/// Configuration for discovery and batch retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Maximum number of image requests in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Timeout for a single request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for establishing a connection, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Deadline for a whole batch retrieval, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// File name offered for the built archive
    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    /// Folder the images are placed under inside the archive (empty for none)
    #[serde(default = "default_archive_folder")]
    pub archive_folder: String,

    /// Entry name used when a URL has no usable last path segment
    #[serde(default = "default_fallback_file_name")]
    pub fallback_file_name: String,

    /// Reject responses whose content type is not image/*
    #[serde(default)]
    pub require_image_content_type: bool,

    /// Upper bound on the number of images a discovery returns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_images: Option<usize>,

    /// Regex filters applied to discovered image URLs
    #[serde(default)]
    pub filter: ImageFilterConfig,
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    4
}

/// Default value for request_timeout_secs
fn default_request_timeout_secs() -> u64 {
    30
}

/// Default value for connect_timeout_secs
fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("yield-images/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_archive_name() -> String {
    "images.zip".to_string()
}

fn default_archive_folder() -> String {
    "images".to_string()
}

fn default_fallback_file_name() -> String {
    "image.jpg".to_string()
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            batch_timeout_secs: None,
            user_agent: default_user_agent(),
            archive_name: default_archive_name(),
            archive_folder: default_archive_folder(),
            fallback_file_name: default_fallback_file_name(),
            require_image_content_type: false,
            max_images: None,
            filter: ImageFilterConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Replace the user agent with the environment override, if one is set
    pub fn apply_env(mut self) -> Self {
        if let Ok(user_agent) = std::env::var(USER_AGENT_ENV) {
            if !user_agent.is_empty() {
                self.user_agent = user_agent;
            }
        }
        self
    }

    /// Concurrency limit, never below one
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// Per-request timeout, never below one second
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_secs.map(|secs| Duration::from_secs(secs.max(1)))
    }
}
