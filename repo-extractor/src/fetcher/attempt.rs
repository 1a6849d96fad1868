//! Candidate branch references and per-attempt outcomes.

use super::error::NetworkErrorKind;
use std::fmt;

/// A branch reference the fetcher tries, in [`BranchRef::CANDIDATES`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRef {
    /// `refs/heads/main`.
    Main,
    /// `refs/heads/master`.
    Master,
    /// The host's default branch.
    Head,
}

impl BranchRef {
    /// Fixed download order.
    pub const CANDIDATES: [BranchRef; 3] = [Self::Main, Self::Master, Self::Head];

    /// Archive path relative to `{base}/{owner}/{repo}/`.
    #[must_use]
    pub fn archive_path(self) -> &'static str {
        match self {
            Self::Main => "archive/refs/heads/main.zip",
            Self::Master => "archive/refs/heads/master.zip",
            Self::Head => "archive/HEAD.zip",
        }
    }

    /// Short name, as used in log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Master => "master",
            Self::Head => "HEAD",
        }
    }

    /// Phrase used in status lines.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Main => "main branch",
            Self::Master => "master branch",
            Self::Head => "default branch",
        }
    }
}

impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// HTTP 200; the body was downloaded.
    Success { bytes: usize },
    /// HTTP 404; the next candidate is tried.
    NotFound,
    /// HTTP 403.
    Forbidden,
    /// Any other status.
    OtherHttpError { status: u16 },
    /// Transport failure.
    NetworkError(NetworkErrorKind),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { bytes } => write!(f, "200 ({bytes} bytes)"),
            Self::NotFound => f.write_str("404"),
            Self::Forbidden => f.write_str("403"),
            Self::OtherHttpError { status } => write!(f, "{status}"),
            Self::NetworkError(kind) => write!(f, "network error ({kind:?})"),
        }
    }
}

/// One request against one candidate branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAttempt {
    /// Branch that was tried.
    pub branch: BranchRef,
    /// Requested URL.
    pub url: String,
    /// What happened.
    pub outcome: AttemptOutcome,
}

/// Renders attempts as `branch: outcome` pairs for log fields.
pub(crate) fn attempt_trail(attempts: &[DownloadAttempt]) -> String {
    attempts
        .iter()
        .map(|attempt| format!("{}: {}", attempt.branch, attempt.outcome))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_in_fixed_order() {
        let paths: Vec<_> = BranchRef::CANDIDATES
            .iter()
            .map(|branch| branch.archive_path())
            .collect();
        assert_eq!(
            paths,
            [
                "archive/refs/heads/main.zip",
                "archive/refs/heads/master.zip",
                "archive/HEAD.zip"
            ]
        );
    }

    #[test]
    fn trail_lists_every_attempt_in_order() {
        let attempt = |branch, outcome| DownloadAttempt {
            branch,
            url: String::new(),
            outcome,
        };
        let attempts = [
            attempt(BranchRef::Main, AttemptOutcome::NotFound),
            attempt(BranchRef::Master, AttemptOutcome::OtherHttpError { status: 502 }),
            attempt(
                BranchRef::Head,
                AttemptOutcome::NetworkError(NetworkErrorKind::Timeout),
            ),
        ];

        assert_eq!(
            attempt_trail(&attempts),
            "main: 404, master: 502, HEAD: network error (Timeout)"
        );
        assert_eq!(attempt_trail(&[]), "");
    }
}
