//! Archive download error types.

use std::fmt;
use thiserror::Error;

/// Category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Could not connect (DNS, refused, TLS handshake).
    Connect,
    /// The request or body read timed out.
    Timeout,
    /// Any other transport failure.
    Other,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "Connection error, please check your internet connection",
            Self::Timeout => "Request timed out, please try again",
            Self::Other => "An error occurred while downloading",
        })
    }
}

/// Transport failure reported by an [`super::ArchiveClient`].
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure category.
    pub kind: NetworkErrorKind,
    /// Underlying error text.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error of the given kind.
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            NetworkErrorKind::Timeout
        } else if error.is_connect() {
            NetworkErrorKind::Connect
        } else {
            NetworkErrorKind::Other
        };
        Self::new(kind, error.to_string())
    }
}

/// Errors that can occur while downloading a repository archive.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every candidate branch returned 404.
    #[error("Repository '{repository}' not found (HTTP 404). It may be private or may not exist")]
    NotFound { repository: String },

    /// The host refused access.
    #[error("Access forbidden (HTTP 403) for {url}. This might be a private repository or the GitHub rate limit was hit")]
    Forbidden { url: String },

    /// Any other non-200 status.
    #[error("Failed to download repository: HTTP {status}: {body}")]
    OtherHttp { status: u16, body: String },

    /// Transport-level failure.
    #[error("{kind} ({url}): {message}")]
    Network {
        kind: NetworkErrorKind,
        url: String,
        message: String,
    },

    /// A download URL could not be built from the base URL.
    #[error("Invalid download URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    pub(crate) fn network(url: &url::Url, error: TransportError) -> Self {
        Self::Network {
            kind: error.kind,
            url: url.to_string(),
            message: error.message,
        }
    }
}
