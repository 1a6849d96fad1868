//! Run summary types and helpers.

mod result;
mod walk_summary;

pub use result::{ExtractionReport, ExtractionResult};
pub use walk_summary::WalkSummary;
