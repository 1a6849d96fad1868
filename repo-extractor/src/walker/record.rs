//! JSONL record types.

use serde::Serialize;

/// Metadata attached to a text file record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    /// File name without directories.
    pub name: String,
    /// Path relative to the extracted tree, `/`-separated.
    pub path: String,
    /// Language derived from the extension.
    pub language: String,
}

/// One line of the output document.
///
/// Serialized with a `type` tag of `file`, `binary` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileRecord {
    /// A file that decoded as UTF-8.
    #[serde(rename = "file")]
    Text {
        metadata: FileMetadata,
        /// Decoded contents, unmodified.
        content: String,
    },

    /// A file that did not decode as UTF-8.
    Binary {
        name: String,
        path: String,
        display: String,
        /// Always `null`.
        content: Option<String>,
        error: String,
    },

    /// A file that could not be read.
    Error {
        path: String,
        display: String,
        error: String,
    },
}

impl FileRecord {
    /// Creates a text record.
    pub fn text(name: &str, path: &str, language: &str, content: String) -> Self {
        Self::Text {
            metadata: FileMetadata {
                name: name.to_string(),
                path: path.to_string(),
                language: language.to_string(),
            },
            content,
        }
    }

    /// Creates a binary record.
    pub fn binary(name: &str, path: &str) -> Self {
        Self::Binary {
            name: name.to_string(),
            path: path.to_string(),
            display: format!("// Binary File: {path}"),
            content: None,
            error: "Binary file".to_string(),
        }
    }

    /// Creates an error record from a read failure message.
    pub fn error(path: &str, message: impl std::fmt::Display) -> Self {
        Self::Error {
            path: path.to_string(),
            display: format!("// Error in file: {path}"),
            error: format!("Error reading file: {message}"),
        }
    }

    /// Relative path of the file this record describes.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Text { metadata, .. } => &metadata.path,
            Self::Binary { path, .. } | Self::Error { path, .. } => path,
        }
    }

    /// Value of the `type` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "file",
            Self::Binary { .. } => "binary",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_text_record() {
        let record = FileRecord::text("app.py", "src/app.py", "python", "a\n\"b\"".to_string());

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "type": "file",
                "metadata": {"name": "app.py", "path": "src/app.py", "language": "python"},
                "content": "a\n\"b\"",
            })
        );
    }

    #[test]
    fn serializes_binary_record_with_null_content() {
        let record = FileRecord::binary("logo.png", "assets/logo.png");

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "type": "binary",
                "name": "logo.png",
                "path": "assets/logo.png",
                "display": "// Binary File: assets/logo.png",
                "content": null,
                "error": "Binary file",
            })
        );
    }

    #[test]
    fn serializes_error_record() {
        let record = FileRecord::error("secret.txt", "permission denied");

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "type": "error",
                "path": "secret.txt",
                "display": "// Error in file: secret.txt",
                "error": "Error reading file: permission denied",
            })
        );
        assert_eq!(record.kind(), "error");
        assert_eq!(record.path(), "secret.txt");
    }

    #[test]
    fn serialized_line_starts_with_type_tag() {
        let line = serde_json::to_string(&FileRecord::binary("a", "a")).unwrap();
        assert!(line.starts_with(r#"{"type":"binary""#));
        assert!(!line.contains('\n'));
    }
}
