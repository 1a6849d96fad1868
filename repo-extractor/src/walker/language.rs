//! Extension-to-language lookup.

use std::path::Path;

/// Language reported for unknown or missing extensions.
pub const DEFAULT_LANGUAGE: &str = "text";

const LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("html", "html"),
    ("css", "css"),
    ("md", "markdown"),
    ("json", "json"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("sql", "sql"),
    ("txt", "text"),
];

/// Returns the language name for `path` based on its extension.
#[must_use]
pub fn language_for(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return DEFAULT_LANGUAGE;
    };

    LANGUAGES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(extension))
        .map_or(DEFAULT_LANGUAGE, |(_, language)| language)
}
