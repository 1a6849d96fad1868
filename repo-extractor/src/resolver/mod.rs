//! Repository reference resolution.
//!
//! Turns user input (a browser URL, an SSH remote, a bare host path or an
//! `owner/repo` shorthand) into a [`RepositoryReference`].

mod error;
mod reference;

pub use error::ResolveError;
pub use reference::RepositoryReference;

use tracing::debug;

/// Accepted input shapes, in the order they are tried.
///
/// The bare shorthand has no prefix and would match the tail of every other
/// shape, so it must stay last.
const PREFIXES: &[&str] = &[
    "https://github.com/",
    "http://github.com/",
    "git@github.com:",
    "github.com/",
    "",
];

/// Resolves user input into a [`RepositoryReference`].
///
/// Any query string or fragment is dropped, then trailing slashes and a
/// single trailing `.git` are stripped before matching. Path segments after
/// `owner/repo` (such as `/tree/main`) are ignored.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidUrl`] if no shape matches or fewer than two
/// path segments are present.
pub fn resolve(input: &str) -> Result<RepositoryReference, ResolveError> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .find(['?', '#'])
        .map_or(trimmed, |end| &trimmed[..end])
        .trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    // The first matching shape decides; a recognized host with a bad path is
    // not retried as shorthand.
    let path = PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);

    match split_owner_name(path) {
        Some((owner, name)) => {
            debug!(input, owner, name, "Resolved repository reference");
            Ok(RepositoryReference::new(owner, name))
        }
        None => Err(ResolveError::InvalidUrl {
            input: input.to_string(),
        }),
    }
}

/// Splits `owner/name[/...]` into its first two segments.
fn split_owner_name(path: &str) -> Option<(&str, &str)> {
    let mut segments = path.split('/');
    let owner = segments.next()?;
    let name = segments.next()?;

    if is_valid_segment(owner) && is_valid_segment(name) {
        Some((owner, name))
    } else {
        None
    }
}

/// Segments are joined into archive URLs and output file names, so anything
/// that would change the URL path or escape the output directory is refused.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.chars().any(|c| {
            c.is_whitespace() || matches!(c, '/' | '\\' | ':' | '@' | '?' | '#' | '%')
        })
}
