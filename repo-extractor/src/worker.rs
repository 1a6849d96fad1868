//! Entry points for callers that must not block their own thread.
//!
//! A GUI starts a run with [`spawn_extraction`], polls the returned
//! [`ExtractionHandle`] for [`ProgressEvent`]s from its event loop, and joins
//! the handle once the run has finished.

use crate::pipeline::{ExtractError, Extractor, ExtractorConfig, Stage};
use crate::progress::{ChannelSink, ProgressEvent, ProgressSink};
use crate::summary::ExtractionResult;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Name given to worker threads.
const WORKER_THREAD_NAME: &str = "repo-extractor";

/// Runs one extraction synchronously on the calling thread.
///
/// Builds a current-thread runtime for the run, so this must not be called
/// from inside an async context.
pub fn extract_blocking(
    config: ExtractorConfig,
    input: &str,
    output_dir: &Path,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
) -> ExtractionResult {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start runtime");
            return ExtractionResult::Failed {
                stage: Stage::Idle,
                message: format!("{} failed: could not start runtime: {e}", Stage::Idle.label()),
            };
        }
    };

    let extractor = match Extractor::new(config) {
        Ok(extractor) => extractor,
        Err(e) => {
            sink.on_status(&e.user_message());
            return e.into();
        }
    };

    runtime
        .block_on(extractor.run(input, output_dir, sink, cancel))
        .into()
}

/// A run executing on its own thread.
pub struct ExtractionHandle {
    events: UnboundedReceiver<ProgressEvent>,
    cancel: CancellationToken,
    thread: JoinHandle<ExtractionResult>,
}

impl ExtractionHandle {
    /// Receiver of the run's progress events.
    ///
    /// The channel closes once the run has finished.
    pub fn events(&mut self) -> &mut UnboundedReceiver<ProgressEvent> {
        &mut self.events
    }

    /// Drains every event available right now without blocking.
    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Requests cooperative cancellation.
    ///
    /// The run stops at the next stage boundary or file and still removes
    /// its scratch directory.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns true once the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the run to finish.
    pub fn join(self) -> ExtractionResult {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => panicked_result(),
        }
    }
}

/// Starts an extraction on a dedicated thread.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_extraction(
    config: ExtractorConfig,
    input: impl Into<String>,
    output_dir: impl Into<PathBuf>,
) -> io::Result<ExtractionHandle> {
    let input = input.into();
    let output_dir = output_dir.into();
    let (sender, events) = unbounded_channel();
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();

    let thread = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            let sink: Arc<dyn ProgressSink> = Arc::new(ChannelSink::new(sender));
            extract_blocking(config, &input, &output_dir, sink, worker_cancel)
        })?;

    Ok(ExtractionHandle {
        events,
        cancel,
        thread,
    })
}

fn panicked_result() -> ExtractionResult {
    let error = ExtractError::Worker {
        stage: Stage::Failed,
        message: "worker thread panicked".to_string(),
    };
    error!(error = %error, "Extraction thread panicked");
    error.into()
}
