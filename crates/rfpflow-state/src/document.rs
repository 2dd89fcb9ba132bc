use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// One raw source document fed into the pipeline.
///
/// The orchestration core treats document content as opaque text; only the
/// requirement-extraction stage looks inside. Binary format extraction
/// (PDF, DOCX) happens upstream of rfpflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Display name, usually the original file name.
    pub name: String,
    /// Full document text.
    pub content: String,
}

impl SourceDocument {
    /// Create a document from in-memory text.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a UTF-8 text document from disk.
    ///
    /// The document name is the file name component of `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read as UTF-8 text.
    pub fn from_file(path: &Utf8Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path.file_name().unwrap_or(path.as_str()).to_string();
        Ok(Self { name, content })
    }

    /// Whether the document carries any non-whitespace content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
