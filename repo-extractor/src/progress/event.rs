//! Progress event values.

/// Prefix of the line form of [`ProgressEvent::Percent`].
const PERCENT_PREFIX: &str = "Downloading: ";

/// A single progress notification emitted by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Human-readable status line.
    Status(String),

    /// Download completion percentage in `0.0..=100.0`.
    Percent(f64),

    /// Heartbeat or per-file marker.
    Tick,
}

impl ProgressEvent {
    /// Renders the event as a single line of text.
    ///
    /// Percent events render as `Downloading: 42.0%`, which
    /// [`parse_percent`] reads back.
    #[must_use]
    pub fn to_line(&self) -> String {
        match self {
            Self::Status(text) => text.clone(),
            Self::Percent(value) => format!("{PERCENT_PREFIX}{value:.1}%"),
            Self::Tick => ".".to_string(),
        }
    }
}

/// Extracts the percentage from a `Downloading: <float>%` line.
///
/// Returns `None` for any other line; those are advisory only.
#[must_use]
pub fn parse_percent(line: &str) -> Option<f64> {
    line.trim()
        .strip_prefix(PERCENT_PREFIX)?
        .strip_suffix('%')?
        .trim()
        .parse()
        .ok()
}
