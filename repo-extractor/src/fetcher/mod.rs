//! Repository archive download.
//!
//! Tries `main`, then `master`, then the host's default branch, stopping at
//! the first HTTP 200. Only a 404 moves on to the next candidate; a 403, any
//! other status or a transport failure ends the fetch immediately.

mod attempt;
mod client;
mod error;

pub use attempt::{AttemptOutcome, BranchRef, DownloadAttempt};
pub use client::{ArchiveClient, ArchiveResponse, ReqwestClient};
pub use error::{FetchError, NetworkErrorKind, TransportError};

#[cfg(test)]
pub(crate) use client::testing;

use crate::progress::ProgressSink;
use attempt::attempt_trail;
use crate::resolver::RepositoryReference;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

/// Upper bound for pre-allocating the archive buffer from `Content-Length`.
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// Chunks between heartbeats when the body length is unknown.
const HEARTBEAT_INTERVAL: usize = 3;

/// A downloaded archive and how it was obtained.
#[derive(Debug, Clone)]
pub struct DownloadedArchive {
    /// Branch that answered with HTTP 200.
    pub branch: BranchRef,
    /// URL the bytes came from.
    pub url: String,
    /// Raw zip bytes.
    pub bytes: Vec<u8>,
    /// Every attempt made, in order, ending with the successful one.
    pub attempts: Vec<DownloadAttempt>,
}

/// Downloads repository archives through an [`ArchiveClient`].
#[derive(Clone)]
pub struct ArchiveFetcher {
    client: Arc<dyn ArchiveClient>,
    base_url: Url,
}

impl ArchiveFetcher {
    /// Creates a fetcher that resolves archive paths against `base_url`.
    ///
    /// `base_url` should end with `/`; paths are joined onto it.
    pub fn new(client: Arc<dyn ArchiveClient>, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Builds the archive URL for one candidate branch.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Url`] if the joined URL is not valid.
    pub fn archive_url(
        &self,
        reference: &RepositoryReference,
        branch: BranchRef,
    ) -> Result<Url, FetchError> {
        Ok(self.base_url.join(&format!(
            "{}/{}/{}",
            reference.owner(),
            reference.name(),
            branch.archive_path()
        ))?)
    }

    /// Downloads the archive for `reference`, trying each candidate branch.
    ///
    /// Emits a status line per attempt and download percentages (or
    /// heartbeat ticks when no length is declared) to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when every candidate returned 404,
    /// and the matching variant for the first 403, other status or
    /// transport failure.
    pub async fn fetch(
        &self,
        reference: &RepositoryReference,
        sink: &dyn ProgressSink,
    ) -> Result<DownloadedArchive, FetchError> {
        let span = info_span!(
            "fetch",
            owner = %reference.owner(),
            repo = %reference.name()
        );

        async {
            let mut attempts = Vec::with_capacity(BranchRef::CANDIDATES.len());

            for branch in BranchRef::CANDIDATES {
                let url = self.archive_url(reference, branch)?;
                sink.on_status(&format!("Trying {}: {url}", branch.description()));
                info!(%branch, %url, "Requesting archive");

                let (outcome, error) = match self.client.get(&url).await {
                    Err(e) => (
                        AttemptOutcome::NetworkError(e.kind),
                        FetchError::network(&url, e),
                    ),
                    Ok(response) => match response.status {
                        200 => {
                            sink.on_status("Connected successfully to repository");
                            match download_body(response, sink).await {
                                Ok(bytes) => {
                                    sink.on_status("Download complete");
                                    attempts.push(DownloadAttempt {
                                        branch,
                                        url: url.to_string(),
                                        outcome: AttemptOutcome::Success { bytes: bytes.len() },
                                    });
                                    info!(
                                        %branch,
                                        bytes = bytes.len(),
                                        attempts = %attempt_trail(&attempts),
                                        "Download complete"
                                    );
                                    return Ok(DownloadedArchive {
                                        branch,
                                        url: url.to_string(),
                                        bytes,
                                        attempts,
                                    });
                                }
                                Err(e) => (
                                    AttemptOutcome::NetworkError(e.kind),
                                    FetchError::network(&url, e),
                                ),
                            }
                        }
                        404 => {
                            debug!(%branch, "Archive not found, trying next branch");
                            attempts.push(DownloadAttempt {
                                branch,
                                url: url.to_string(),
                                outcome: AttemptOutcome::NotFound,
                            });
                            continue;
                        }
                        403 => (
                            AttemptOutcome::Forbidden,
                            FetchError::Forbidden {
                                url: url.to_string(),
                            },
                        ),
                        status => {
                            let body = read_body_text(response).await;
                            (
                                AttemptOutcome::OtherHttpError { status },
                                FetchError::OtherHttp { status, body },
                            )
                        }
                    },
                };

                attempts.push(DownloadAttempt {
                    branch,
                    url: url.to_string(),
                    outcome,
                });
                warn!(
                    %branch,
                    attempts = %attempt_trail(&attempts),
                    error = %error,
                    "Archive download failed"
                );
                return Err(error);
            }

            warn!(attempts = %attempt_trail(&attempts), "No candidate branch found");
            Err(FetchError::NotFound {
                repository: reference.to_string(),
            })
        }
        .instrument(span)
        .await
    }
}

/// Reads the whole body, reporting progress as chunks arrive.
async fn download_body(
    response: ArchiveResponse,
    sink: &dyn ProgressSink,
) -> Result<Vec<u8>, TransportError> {
    let total = response.content_length.filter(|&length| length > 0);
    let capacity = total.unwrap_or(0).min(MAX_PREALLOCATION) as usize;
    let mut bytes = Vec::with_capacity(capacity);
    let mut body = response.body;
    let mut chunks = 0usize;
    let mut last_reported: Option<f64> = None;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        bytes.extend_from_slice(&chunk);

        match total {
            Some(total) => {
                let percent = (bytes.len() as f64 * 100.0 / total as f64).min(100.0);
                // Only forward changes visible at one decimal place.
                let rounded = (percent * 10.0).round() / 10.0;
                if last_reported.map_or(true, |last| rounded > last) {
                    sink.on_percent(rounded);
                    last_reported = Some(rounded);
                }
            }
            None => {
                if chunks % HEARTBEAT_INTERVAL == 0 {
                    sink.on_tick();
                }
            }
        }
        chunks += 1;
    }

    Ok(bytes)
}

/// Collects a non-200 body as text for error reporting.
async fn read_body_text(response: ArchiveResponse) -> String {
    let mut body = response.body;
    let mut bytes = Vec::new();
    while let Some(Ok(chunk)) = body.next().await {
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
