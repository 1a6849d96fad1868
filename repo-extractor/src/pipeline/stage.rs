//! Pipeline stages.

use std::fmt;

/// Position of a run in the pipeline.
///
/// Runs move strictly forward through `Resolving`, `Fetching`, `Unpacking`
/// and `Walking` to `Done`. Any error moves the run to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Not started; setup failures are attributed here.
    Idle,
    Resolving,
    Fetching,
    Unpacking,
    Walking,
    Done,
    Failed,
}

impl Stage {
    /// Name of the step, used to attribute failure messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Setup",
            Self::Resolving => "Repository URL resolution",
            Self::Fetching => "Download",
            Self::Unpacking => "Archive extraction",
            Self::Walking => "Writing contents",
            Self::Done => "Extraction",
            Self::Failed => "Extraction",
        }
    }

    /// Status line announced when the stage is entered.
    pub(crate) fn status_line(self) -> Option<&'static str> {
        match self {
            Self::Resolving => Some("Starting repository extraction..."),
            Self::Unpacking => Some("Extracting files..."),
            Self::Walking => Some("Writing contents to file..."),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Fetching => "fetching",
            Self::Unpacking => "unpacking",
            Self::Walking => "walking",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}
