//! Build errors
//!
//! Every variant is fatal for the build: there is no retry and no partial output.

use thiserror::Error;

/// Errors raised while enumerating, loading or transforming posts
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("missing configuration value `{0}` (set it in _config.yml or the environment)")]
    MissingConfig(&'static str),

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed post collection: {0}")]
    MalformedCollection(String),

    #[error("invalid post id `{0}`")]
    InvalidId(String),

    #[error("requested post `{requested}` but the API returned `{returned}`")]
    IdMismatch { requested: String, returned: String },

    #[error("failed to highlight code block #{index}: {source}")]
    Highlight {
        index: usize,
        #[source]
        source: syntect::Error,
    },

    #[error("failed to build stylesheet: {0}")]
    Stylesheet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// HTTP status of a failed API call, if the server answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            BuildError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
