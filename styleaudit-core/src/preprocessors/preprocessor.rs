// Preprocessor abstraction for document ingestion
//
// This module defines the boundary between reading a document (bytes, files,
// streams) and auditing it (Document -> Issues). Everything after this point
// works with the `Document` model and does not care where the markup came from.

use crate::error::Result;
use crate::types::Document;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

const UTF8_BOM: &str = "\u{feff}";

/// Where a document comes from. Resolved exactly once into an owned buffer.
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    Reader(Box<dyn Read + Send>),
}

impl DocumentSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Read the whole source into memory
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Path(path) => Ok(std::fs::read(path)?),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// Read the whole source and decode it as markup text
    pub fn into_markup(self) -> Result<String> {
        let bytes = self.into_bytes()?;
        Ok(decode_markup(&bytes))
    }

    /// Short label for logs and task records
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            Self::Reader(_) => "<stream>".to_string(),
        }
    }
}

impl fmt::Debug for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Lossy UTF-8 decode with a leading byte-order mark removed.
/// Invalid sequences become U+FFFD instead of failing the whole document.
pub fn decode_markup(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Preprocessor trait - converts raw documents into the `Document` model
///
/// Preprocessors handle:
/// - Decoding the raw bytes into markup
/// - Recovering paragraphs and runs from that markup
/// - Style extraction (fonts, indentation)
///
/// Parsing markup is total: malformed input yields a smaller document, never
/// an error. Only reading the input can fail.
pub trait Preprocessor: Send + Sync {
    /// Parse already-decoded markup into a `Document`
    fn parse_markup(&self, markup: &str) -> Document;

    /// Decode raw bytes and parse them
    fn process(&self, bytes: &[u8]) -> Document {
        self.parse_markup(&decode_markup(bytes))
    }

    /// Resolve any document source and parse it
    fn process_source(&self, source: DocumentSource) -> Result<Document> {
        let markup = source.into_markup()?;
        Ok(self.parse_markup(&markup))
    }

    /// Convenience method: process from file path
    fn process_file(&self, input: &Path) -> Result<Document> {
        let bytes = std::fs::read(input)?;
        Ok(self.process(&bytes))
    }

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}
