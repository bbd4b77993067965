//! Error types for rangeflow-loader.

use thiserror::Error;

use crate::data::{ErrorDetail, ErrorKind};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("seek handler rejected request: {0}")]
    Seek(String),

    /// A terminal failure the observer declined to handle.
    #[error("unhandled loader failure ({kind}): {detail}")]
    Unhandled { kind: ErrorKind, detail: ErrorDetail },

    #[error("transport setup failed: {0}")]
    Transport(String),
}

impl LoaderError {
    pub(crate) fn invalid_url(url: &str, e: url::ParseError) -> Self {
        LoaderError::InvalidUrl {
            url:    url.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for LoaderError {
    fn from(e: reqwest::Error) -> Self { LoaderError::Transport(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, LoaderError>;
