//! Extraction pipeline orchestration.
//!
//! Sequences resolve, fetch, unpack and walk for one repository, owning the
//! run's scratch directory. The scratch directory is removed when the run
//! ends, whether it succeeded or failed.

mod config;
mod error;
mod stage;

pub use config::{ExtractorConfig, DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR};
pub use error::ExtractError;
pub use stage::Stage;

use crate::fetcher::{ArchiveClient, ArchiveFetcher, ReqwestClient};
use crate::progress::ProgressSink;
use crate::resolver::{resolve, RepositoryReference};
use crate::summary::{ExtractionReport, ExtractionResult};
use crate::unpacker::unpack;
use crate::walker::write_jsonl;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// Prefix of per-run scratch directory names.
const SCRATCH_PREFIX: &str = "repo-extractor-";

/// Runs repository extractions.
pub struct Extractor {
    config: ExtractorConfig,
    fetcher: ArchiveFetcher,
}

impl Extractor {
    /// Builds an extractor that downloads over HTTPS with `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let client = ReqwestClient::new(config.user_agent(), config.request_timeout())?;
        Self::with_client(config, Arc::new(client))
    }

    /// Builds an extractor that downloads through `client`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidBaseUrl`] if the base URL is invalid.
    pub fn with_client(
        config: ExtractorConfig,
        client: Arc<dyn ArchiveClient>,
    ) -> Result<Self, ExtractError> {
        let base_url =
            Url::parse(config.base_url()).map_err(|source| ExtractError::InvalidBaseUrl {
                url: config.base_url().to_string(),
                source,
            })?;
        Ok(Self {
            fetcher: ArchiveFetcher::new(client, base_url),
            config,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts `input` into `{output_dir}/{repo}_contents.jsonl`.
    ///
    /// Collaborator entry point: failures are folded into the returned
    /// [`ExtractionResult`].
    pub async fn extract(
        &self,
        input: &str,
        output_dir: &Path,
        sink: Arc<dyn ProgressSink>,
    ) -> ExtractionResult {
        self.run(input, output_dir, sink, CancellationToken::new())
            .await
            .into()
    }

    /// Runs the full pipeline.
    ///
    /// Cancellation is checked between stages and between files, and aborts
    /// an in-flight download.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; its [`ExtractError::stage`] names the
    /// stage it occurred in. The failure message is also sent to `sink`.
    pub async fn run(
        &self,
        input: &str,
        output_dir: &Path,
        sink: Arc<dyn ProgressSink>,
        cancel: CancellationToken,
    ) -> Result<ExtractionReport, ExtractError> {
        let result = self.run_stages(input, output_dir, &sink, &cancel).await;

        match &result {
            Ok(report) => {
                enter(Stage::Done, sink.as_ref());
                sink.on_status(&format!(
                    "Extraction complete! Saved to {}",
                    report.output_path.display()
                ));
            }
            Err(e) => {
                error!(stage = %e.stage(), error = %e, "Extraction failed");
                enter(Stage::Failed, sink.as_ref());
                sink.on_status(&e.user_message());
            }
        }

        result
    }

    async fn run_stages(
        &self,
        input: &str,
        output_dir: &Path,
        sink: &Arc<dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<ExtractionReport, ExtractError> {
        enter(Stage::Resolving, sink.as_ref());
        let reference = resolve(input)?;
        sink.on_status(&format!("Repository: {}", reference.canonical_url()));
        check_cancelled(cancel, Stage::Resolving)?;

        enter(Stage::Fetching, sink.as_ref());
        let scratch = self.create_scratch()?;
        let result = self
            .process(&reference, output_dir, scratch.path(), sink, cancel)
            .await;
        remove_scratch(scratch);
        result
    }

    /// Stages that use the scratch directory.
    async fn process(
        &self,
        reference: &RepositoryReference,
        output_dir: &Path,
        scratch: &Path,
        sink: &Arc<dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<ExtractionReport, ExtractError> {
        let archive = tokio::select! {
            result = self.fetcher.fetch(reference, sink.as_ref()) => result?,
            () = cancel.cancelled() => {
                warn!(stage = %Stage::Fetching, "Extraction cancelled during download");
                return Err(ExtractError::Cancelled { stage: Stage::Fetching });
            }
        };
        debug!(
            url = %archive.url,
            attempts = archive.attempts.len(),
            "Archive downloaded"
        );
        check_cancelled(cancel, Stage::Fetching)?;

        enter(Stage::Unpacking, sink.as_ref());
        let bytes = archive.bytes;
        let scratch = scratch.to_path_buf();
        let tree = run_blocking(Stage::Unpacking, move || unpack(&bytes, &scratch)).await?;
        check_cancelled(cancel, Stage::Unpacking)?;

        enter(Stage::Walking, sink.as_ref());
        fs::create_dir_all(output_dir).map_err(|source| ExtractError::OutputDirectory {
            path: output_dir.display().to_string(),
            source,
        })?;
        let output_path = output_path(output_dir, reference);
        sink.on_status(&format!("Processing files from: {}", tree.root().display()));

        let summary = {
            let root = tree.root().to_path_buf();
            let output = output_path.clone();
            let sink = Arc::clone(sink);
            let cancel = cancel.clone();
            run_blocking(Stage::Walking, move || {
                write_jsonl(&root, &output, sink.as_ref(), &cancel)
            })
            .await?
        };

        info!(
            repo = %reference,
            branch = %archive.branch,
            output = %output_path.display(),
            records = summary.records(),
            "Extraction complete"
        );

        Ok(ExtractionReport {
            repository: reference.clone(),
            branch: archive.branch.to_string(),
            output_path,
            summary,
        })
    }

    fn create_scratch(&self) -> Result<TempDir, ExtractError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);

        let scratch = match self.config.scratch_root() {
            Some(root) => {
                fs::create_dir_all(root).map_err(ExtractError::ScratchDirectory)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(ExtractError::ScratchDirectory)?;

        debug!(path = %scratch.path().display(), "Created scratch directory");
        Ok(scratch)
    }
}

/// Path of the JSONL document for `reference` inside `output_dir`.
#[must_use]
pub fn output_path(output_dir: &Path, reference: &RepositoryReference) -> PathBuf {
    output_dir.join(format!("{}_contents.jsonl", reference.name()))
}

fn enter(stage: Stage, sink: &dyn ProgressSink) {
    debug!(%stage, "Entering stage");
    if let Some(line) = stage.status_line() {
        sink.on_status(line);
    }
}

fn check_cancelled(cancel: &CancellationToken, stage: Stage) -> Result<(), ExtractError> {
    if cancel.is_cancelled() {
        warn!(%stage, "Extraction cancelled");
        return Err(ExtractError::Cancelled { stage });
    }
    Ok(())
}

/// Runs filesystem-bound work off the async executor.
async fn run_blocking<T, E>(
    stage: Stage,
    task: impl FnOnce() -> Result<T, E> + Send + 'static,
) -> Result<T, ExtractError>
where
    T: Send + 'static,
    E: Into<ExtractError> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(Into::into),
        Err(e) => Err(ExtractError::Worker {
            stage,
            message: e.to_string(),
        }),
    }
}

/// Best-effort scratch removal; failures are logged, never returned.
fn remove_scratch(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    match scratch.close() {
        Ok(()) => debug!(path = %path.display(), "Removed scratch directory"),
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove scratch directory"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::ScriptedClient;
    use crate::fetcher::{ArchiveResponse, FetchError, TransportError};
    use crate::progress::testing::RecordingSink;
    use crate::unpacker::testing::build_zip;
    use crate::unpacker::UnpackError;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        sink: Arc<RecordingSink>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                temp: TempDir::new().unwrap(),
                sink: Arc::new(RecordingSink::default()),
            }
        }

        fn scratch_root(&self) -> PathBuf {
            self.temp.path().join("scratch")
        }

        fn output_dir(&self) -> PathBuf {
            self.temp.path().join("output")
        }

        fn extractor(&self, client: ScriptedClient) -> Extractor {
            let config = ExtractorConfig::new().with_scratch_root(self.scratch_root());
            Extractor::with_client(config, Arc::new(client)).unwrap()
        }

        async fn run(&self, client: ScriptedClient, input: &str) -> Result<ExtractionReport, ExtractError> {
            self.run_with(client, input, CancellationToken::new()).await
        }

        async fn run_with(
            &self,
            client: ScriptedClient,
            input: &str,
            cancel: CancellationToken,
        ) -> Result<ExtractionReport, ExtractError> {
            self.extractor(client)
                .run(input, &self.output_dir(), self.sink.clone(), cancel)
                .await
        }

        fn scratch_is_empty(&self) -> bool {
            match fs::read_dir(self.scratch_root()) {
                Ok(mut entries) => entries.next().is_none(),
                Err(_) => true,
            }
        }
    }

    fn sample_archive() -> Vec<u8> {
        build_zip(&[
            ("repo-main/", b""),
            ("repo-main/app.py", b"print('hi')\n"),
            ("repo-main/logo.png", &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0xff]),
            ("repo-main/.git/config", b"[core]\n"),
        ])
    }

    fn serving(archive: Vec<u8>) -> ScriptedClient {
        ScriptedClient::default().route("refs/heads/main.zip", move || {
            Ok(ArchiveResponse::from_bytes(200, archive.clone()))
        })
    }

    #[tokio::test]
    async fn can_extract_repository() {
        let fixture = Fixture::new();

        let report = fixture
            .run(serving(sample_archive()), "https://github.com/owner/repo.git")
            .await
            .unwrap();

        assert_eq!(report.output_path, fixture.output_dir().join("repo_contents.jsonl"));
        assert_eq!(report.branch, "main");
        assert_eq!(report.summary.text_files, 1);
        assert_eq!(report.summary.binary_files, 1);
        assert_eq!(report.summary.skipped, 1);

        let contents = fs::read_to_string(&report.output_path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "file");
        assert_eq!(lines[0]["metadata"]["path"], "app.py");
        assert_eq!(lines[1]["type"], "binary");
        assert_eq!(lines[1]["path"], "logo.png");

        assert!(fixture.scratch_is_empty());
        let statuses = fixture.sink.statuses();
        assert!(statuses.iter().any(|line| line.starts_with("Extraction complete!")));
    }

    #[tokio::test]
    async fn invalid_input_fails_before_download() {
        let fixture = Fixture::new();
        let client = ScriptedClient::default();

        let error = fixture.run(client, "not a url").await.unwrap_err();

        assert!(matches!(error, ExtractError::Resolve(_)));
        assert_eq!(error.stage(), Stage::Resolving);
        assert!(!fixture.output_dir().exists());
        assert!(fixture.scratch_is_empty());
    }

    #[tokio::test]
    async fn missing_repository_fails_in_fetch_and_cleans_up() {
        let fixture = Fixture::new();

        let error = fixture
            .run(ScriptedClient::default(), "owner/missing")
            .await
            .unwrap_err();

        assert!(matches!(error, ExtractError::Fetch(FetchError::NotFound { .. })));
        assert!(fixture.scratch_is_empty());
        let statuses = fixture.sink.statuses();
        assert!(statuses
            .last()
            .unwrap()
            .starts_with("Download failed: "));
    }

    #[tokio::test]
    async fn empty_archive_fails_in_unpack_and_cleans_up() {
        let fixture = Fixture::new();
        let archive = build_zip(&[("stray.txt", b"no top-level directory")]);

        let error = fixture.run(serving(archive), "owner/repo").await.unwrap_err();

        assert!(matches!(error, ExtractError::Unpack(UnpackError::EmptyArchive)));
        assert_eq!(error.stage(), Stage::Unpacking);
        assert!(fixture.scratch_is_empty());
        assert!(!fixture.output_dir().join("repo_contents.jsonl").exists());
    }

    #[tokio::test]
    async fn cancelled_run_still_cleans_up() {
        let fixture = Fixture::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = fixture
            .run_with(serving(sample_archive()), "owner/repo", cancel)
            .await
            .unwrap_err();

        assert!(error.is_cancelled());
        assert_eq!(error.stage(), Stage::Resolving);
        assert!(fixture.scratch_is_empty());
    }

    /// Client whose requests never complete.
    struct StalledClient;

    #[async_trait::async_trait]
    impl ArchiveClient for StalledClient {
        async fn get(&self, _url: &Url) -> Result<ArchiveResponse, TransportError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn cancel_interrupts_stalled_download() {
        let fixture = Fixture::new();
        let config = ExtractorConfig::new().with_scratch_root(fixture.scratch_root());
        let extractor = Extractor::with_client(config, Arc::new(StalledClient)).unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            extractor.run("owner/repo", &fixture.output_dir(), fixture.sink.clone(), cancel),
        )
        .await
        .expect("cancelled download should finish");

        match result {
            Err(ExtractError::Cancelled { stage }) => assert_eq!(stage, Stage::Fetching),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(fixture.scratch_is_empty());
    }

    #[tokio::test]
    async fn extract_folds_errors_into_result() {
        let fixture = Fixture::new();
        let extractor = fixture.extractor(ScriptedClient::default().status(
            "refs/heads/main.zip",
            403,
            "",
        ));

        let result = extractor
            .extract("owner/repo", &fixture.output_dir(), fixture.sink.clone())
            .await;

        match result {
            ExtractionResult::Failed { stage, message } => {
                assert_eq!(stage, Stage::Fetching);
                assert!(message.contains("403"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = ExtractorConfig::new().with_base_url("not a base url");
        let result = Extractor::with_client(config, Arc::new(ScriptedClient::default()));

        assert!(matches!(result, Err(ExtractError::InvalidBaseUrl { .. })));
    }
}
