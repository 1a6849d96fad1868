#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod fetcher;
pub mod pipeline;
pub mod progress;
pub mod resolver;
pub mod summary;
pub mod unpacker;
pub mod walker;
pub mod worker;

pub use config::{load_settings, ConfigError, ExtractorSettings};
pub use fetcher::{
    ArchiveClient, ArchiveFetcher, ArchiveResponse, AttemptOutcome, BranchRef, DownloadAttempt,
    DownloadedArchive, FetchError, NetworkErrorKind, ReqwestClient, TransportError,
};
pub use pipeline::{
    output_path, ExtractError, Extractor, ExtractorConfig, Stage, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT_DIR,
};
pub use progress::{
    parse_percent, ChannelSink, NullSink, ProgressEvent, ProgressSink, TracingSink,
};
pub use resolver::{resolve, RepositoryReference, ResolveError};
pub use summary::{ExtractionReport, ExtractionResult, WalkSummary};
pub use unpacker::{unpack, ExtractedTree, UnpackError};
pub use walker::{
    is_excluded, language_for, write_jsonl, FileMetadata, FileRecord, WalkError, Walker,
    EXCLUDED_PREFIXES,
};
pub use worker::{extract_blocking, spawn_extraction, ExtractionHandle};
