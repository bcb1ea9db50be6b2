//! Word-processor HTML parser
//!
//! Rebuilds a `Document` from the "Web Page" export of a word processor.
//! The export carries no semantic structure, so the model is recovered from
//! inline markup alone:
//! - Content lives between `<body ...>` and `</body>`
//! - Paragraphs are `<p class=...>` elements (`MsoNormal`, `MsoBodyText`, ...)
//! - Runs are the `<span ...>` elements inside a paragraph
//! - Fonts and indentation come from inline `style` attributes
//!
//! Parsing is total: markup that does not match degrades to fewer (or zero)
//! paragraphs, never to an error.

use super::style::StyleExtractor;
use crate::types::*;
use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled regexes for export parsing
static BODY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body>").unwrap());

static PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<p class=[^>]*>)(.*?)</p>").unwrap());

// Lazy on purpose: a nested span ends the run at the first closing tag
static RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<span[^>]*>.*?</span>").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Parse an HTML export into a `Document`
pub fn parse_html(html: &str, extractor: &StyleExtractor) -> Document {
    let Some(body) = extract_body(html) else {
        log::warn!("No <body> element found - document is empty");
        return Document::default();
    };

    let mut paragraphs = Vec::new();
    let mut dropped = 0usize;

    for p_cap in PARAGRAPH_REGEX.captures_iter(body) {
        if let (Some(opening_tag), Some(content)) = (p_cap.get(1), p_cap.get(2)) {
            let paragraph = build_paragraph(opening_tag.as_str(), content.as_str(), extractor);

            if paragraph.is_blank() {
                dropped += 1;
                continue;
            }
            paragraphs.push(paragraph);
        }
    }

    log::debug!(
        "HTML parsing complete: {} paragraphs kept, {} blank paragraphs dropped",
        paragraphs.len(),
        dropped
    );

    Document::new(paragraphs)
}

/// Content between the body tags, if the export has one
fn extract_body(html: &str) -> Option<&str> {
    BODY_REGEX
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

fn build_paragraph(opening_tag: &str, content: &str, extractor: &StyleExtractor) -> Paragraph {
    let runs = extract_runs_from_paragraph(content, extractor);
    let paragraph_format = extractor.extract_paragraph_format(opening_tag);
    Paragraph::new(runs, paragraph_format)
}

/// Every span of a paragraph becomes one run, in document order
fn extract_runs_from_paragraph(paragraph_html: &str, extractor: &StyleExtractor) -> Vec<Run> {
    RUN_REGEX
        .find_iter(paragraph_html)
        .map(|run_match| {
            let run_html = run_match.as_str();
            let text = strip_tags(run_html);
            let font = extractor.extract_font(run_html);
            Run::new(text, run_html, font)
        })
        .collect()
}

fn strip_tags(fragment: &str) -> String {
    TAG_REGEX.replace_all(fragment, "").into_owned()
}
