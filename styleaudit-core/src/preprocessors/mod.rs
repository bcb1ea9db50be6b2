//! Document Preprocessors
//!
//! This module provides the ingestion layer that turns a raw document into the
//! `Document` model the rule engine audits.
//!
//! ## Architecture
//!
//! ```text
//! DocumentSource (path, bytes, stream)
//!     ↓
//! [Lossy UTF-8 decode]
//!     ↓
//! [Format-specific Preprocessor]
//!     ↓
//! Document (paragraphs → runs → fonts)
//!     ↓
//! [Heading classifier + Rule engine]
//! ```
//!
//! ## Available Preprocessors
//!
//! - `HtmlPreprocessor` - word-processor "Web Page" HTML exports

pub mod html;
pub mod preprocessor;

pub use html::{HtmlPreprocessor, StyleExtractor};
pub use preprocessor::{decode_markup, DocumentSource, Preprocessor};
