use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Reason a single page or image request did not produce a usable body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchCause {
    /// Server answered with a non-success status code
    Status(u16),
    /// Request exceeded the per-request timeout
    Timeout,
    /// Connection, TLS, redirect or body read failure
    Network(String),
    /// Response was not declared as an image
    NotAnImage(String),
    /// URL was not an absolute http(s) URL
    InvalidUrl(String),
    /// Batch was cancelled before this request completed
    Cancelled,
}

impl FetchCause {
    /// Classify a reqwest error into a cause
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchCause::Timeout
        } else if let Some(status) = error.status() {
            FetchCause::Status(status.as_u16())
        } else {
            FetchCause::Network(error.to_string())
        }
    }
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchCause::Status(code) => write!(f, "HTTP status {}", code),
            FetchCause::Timeout => write!(f, "request timed out"),
            FetchCause::Network(msg) => write!(f, "network error: {}", msg),
            FetchCause::NotAnImage(content_type) => {
                write!(f, "not an image (content-type {})", content_type)
            }
            FetchCause::InvalidUrl(msg) => write!(f, "invalid URL ({})", msg),
            FetchCause::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to fetch {url}: {cause}")]
    FetchFailed { url: String, cause: FetchCause },

    #[error("failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn fetch_failed(url: impl Into<String>, cause: FetchCause) -> Self {
        Error::FetchFailed {
            url: url.into(),
            cause,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
