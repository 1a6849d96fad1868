//! CLI for the repository extractor.
//!
//! Downloads a GitHub repository and writes its files into a JSONL document.

use clap::Parser;
use repo_extractor::{
    load_settings, ExtractError, ExtractionReport, Extractor, ExtractorSettings, ProgressSink,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit code after a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Repository Extractor - Download a GitHub repository and serialize its files to JSONL.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository URL or owner/repo shorthand.
    repository: String,

    /// Directory to write `{repo}_contents.jsonl` into [default: ./output].
    output_dir: Option<PathBuf>,

    /// Path to a TOML settings file.
    #[arg(long, env = "REPO_EXTRACTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Overall HTTP request timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Archive host base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Suppress progress output.
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    let settings = match args.config.as_deref().map(load_settings).transpose() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => {
            error!(error = %e, "Failed to load settings");
            return ExitCode::from(2);
        }
    };

    let extractor = match build_extractor(&args, &settings) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!(error = %e, "Failed to initialize extractor");
            return ExitCode::from(2);
        }
    };

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir());

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let sink = Arc::new(ConsoleSink::new(args.quiet));
    match extractor
        .run(&args.repository, &output_dir, sink.clone(), cancel)
        .await
    {
        Ok(report) => {
            sink.finish_line();
            print_summary(&report);
            ExitCode::from(0)
        }
        Err(e) => {
            sink.finish_line();
            eprintln!("Error: {}", e.user_message());
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "warn"; progress
///   is already reported through the console sink)
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

/// Merges command-line flags over the settings file.
fn build_extractor(args: &Args, settings: &ExtractorSettings) -> Result<Extractor, ExtractError> {
    let mut config = settings.to_config();
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    Extractor::new(config)
}

/// Cancels the run on the first Ctrl-C; the pipeline still cleans up its
/// scratch directory. A second Ctrl-C exits immediately.
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, cancelling");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Second interrupt received, exiting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });
}

/// Prints the final run summary.
fn print_summary(report: &ExtractionReport) {
    let summary = &report.summary;
    println!("\nSummary:");
    println!("  Repository: {}", report.repository);
    println!("  Branch: {}", report.branch);
    println!("  Output: {}", report.output_path.display());
    println!("  Text files: {}", summary.text_files);
    println!("  Binary files: {}", summary.binary_files);
    println!("  Unreadable files: {}", summary.error_files);
    println!("  Skipped: {}", summary.skipped);
}

/// Writes progress to stderr.
///
/// Percentages are redrawn in place; ticks print a dot.
struct ConsoleSink {
    quiet: bool,
    /// Whether the cursor is mid-line after a percentage or dot.
    inline: AtomicBool,
}

impl ConsoleSink {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            inline: AtomicBool::new(false),
        }
    }

    fn finish_line(&self) {
        if self.inline.swap(false, Ordering::Relaxed) {
            eprintln!();
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn on_status(&self, text: &str) {
        if self.quiet {
            return;
        }
        self.finish_line();
        eprintln!("{text}");
    }

    fn on_percent(&self, value: f64) {
        if self.quiet {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\rDownloading: {value:.1}%");
        let _ = stderr.flush();
        self.inline.store(true, Ordering::Relaxed);
    }

    fn on_tick(&self) {
        if self.quiet {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, ".");
        let _ = stderr.flush();
        self.inline.store(true, Ordering::Relaxed);
    }
}
