//! HTTP client abstraction used by the fetcher.

use super::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Response to an archive request.
pub struct ArchiveResponse {
    /// HTTP status code.
    pub status: u16,

    /// Declared body length, if the server sent one.
    pub content_length: Option<u64>,

    /// Body chunks in arrival order.
    pub body: BoxStream<'static, Result<Bytes, TransportError>>,
}

impl ArchiveResponse {
    /// Builds a response whose body is delivered as the given chunks.
    pub fn from_chunks(status: u16, chunks: Vec<Bytes>, content_length: Option<u64>) -> Self {
        Self {
            status,
            content_length,
            body: stream::iter(chunks.into_iter().map(Ok)).boxed(),
        }
    }

    /// Builds a response with a single-chunk body and a matching length.
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let length = body.len() as u64;
        Self::from_chunks(status, vec![body], Some(length))
    }
}

impl fmt::Debug for ArchiveResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Issues GET requests for archive URLs.
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Requests `url`. Non-2xx statuses are returned as responses, not errors.
    async fn get(&self, url: &Url) -> Result<ArchiveResponse, TransportError>;
}

/// [`ArchiveClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Builds a client with the given user agent and optional timeout.
    ///
    /// With no timeout, reqwest's default (none) applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ArchiveClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<ArchiveResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        Ok(ArchiveResponse {
            status: response.status().as_u16(),
            content_length: response.content_length(),
            body: response.bytes_stream().map_err(TransportError::from).boxed(),
        })
    }
}
