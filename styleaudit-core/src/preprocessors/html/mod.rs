//! HTML Preprocessor
//!
//! Reads the "Web Page" (filtered HTML) export of a word processor and
//! rebuilds the paragraph/run model from inline styles.

pub mod html_parser;
pub mod style;

use crate::preprocessors::preprocessor::Preprocessor;
use crate::types::Document;
use std::path::Path;

pub use style::StyleExtractor;

/// Preprocessor for word-processor HTML exports
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPreprocessor {
    extractor: StyleExtractor,
}

impl HtmlPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preprocessor that also maps `font-weight` and `<b>` to run bold flags
    pub fn with_bold_detection(detect_bold: bool) -> Self {
        Self {
            extractor: StyleExtractor::new(detect_bold),
        }
    }

    pub fn extractor(&self) -> &StyleExtractor {
        &self.extractor
    }
}

impl Preprocessor for HtmlPreprocessor {
    fn parse_markup(&self, markup: &str) -> Document {
        html_parser::parse_html(markup, &self.extractor)
    }

    fn name(&self) -> &str {
        "HtmlPreprocessor"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        if let Some(extension) = path.extension() {
            // the conversion service hands the export over as .txt as well
            matches!(
                extension.to_str().unwrap_or("").to_lowercase().as_str(),
                "html" | "htm" | "txt"
            )
        } else {
            false
        }
    }
}
