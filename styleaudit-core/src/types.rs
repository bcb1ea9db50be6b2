use serde::{Deserialize, Serialize};

// ===== DOCUMENT MODEL =====
// Built once per input by the HTML preprocessor and never mutated afterwards.
// Every style attribute is optional: the export dialect does not guarantee
// any of them, and "absent" must stay distinguishable from a zero/false value.

/// Rendering style of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    pub name: Option<String>,
    /// `None` means "unknown", not "not bold"
    pub bold: Option<bool>,
    /// Point size, truncated to an integer
    pub size: Option<u32>,
}

impl Font {
    pub fn new(name: Option<String>, bold: Option<bool>, size: Option<u32>) -> Self {
        Self { name, bold, size }
    }
}

/// Smallest text unit with uniform style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    /// The run fragment exactly as it appeared in the markup
    pub html: String,
    pub font: Font,
}

impl Run {
    pub fn new(text: impl Into<String>, html: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into().replace("&nbsp;", " "),
            html: html.into(),
            font,
        }
    }

    /// Runs made only of whitespace do not take part in style inference
    pub fn has_visible_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Paragraph-level indentation, in the units the export uses
/// (`mso-char-indent-count` characters for the first line)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    pub first_line_indent: Option<i32>,
    pub left_indent: Option<i32>,
}

/// The (font name, bold) pair covering the most visible text in a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantFont {
    pub name: Option<String>,
    pub bold: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub text: String,
    pub html: String,
    /// `None` when the paragraph has no visible run at all
    pub dominant_font: Option<DominantFont>,
    pub dominant_size: Option<u32>,
    pub paragraph_format: ParagraphFormat,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>, paragraph_format: ParagraphFormat) -> Self {
        let text = runs.iter().map(|run| run.text.as_str()).collect::<String>();
        let html = runs.iter().map(|run| run.html.as_str()).collect::<String>();
        let dominant_font = dominant_by(&runs, |run| DominantFont {
            name: run.font.name.clone(),
            bold: run.font.bold,
        });
        let dominant_size = dominant_by(&runs, |run| run.font.size).flatten();

        Self {
            runs,
            text,
            html,
            dominant_font,
            dominant_size,
            paragraph_format,
        }
    }

    /// Dominant font family name, if any visible run carries one
    pub fn font_name(&self) -> Option<&str> {
        self.dominant_font.as_ref().and_then(|f| f.name.as_deref())
    }

    pub fn bold(&self) -> Option<bool> {
        self.dominant_font.as_ref().and_then(|f| f.bold)
    }

    /// Export placeholders for empty lines: nothing, a space, or a lone NBSP
    pub fn is_blank(&self) -> bool {
        matches!(self.text.as_str(), "" | " " | "\u{a0}" | "&nbsp;")
    }
}

/// Sum visible text length per key and return the heaviest key.
/// Ties resolve to the key seen first in run order.
fn dominant_by<K, F>(runs: &[Run], key_of: F) -> Option<K>
where
    K: PartialEq,
    F: Fn(&Run) -> K,
{
    let mut totals: Vec<(K, usize)> = Vec::new();

    for run in runs.iter().filter(|run| run.has_visible_text()) {
        let key = key_of(run);
        let len = run.text.chars().count();
        match totals.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 += len,
            None => totals.push((key, len)),
        }
    }

    let mut best: Option<(K, usize)> = None;
    for (key, total) in totals {
        let heavier = best
            .as_ref()
            .map_or(true, |(_, best_total)| total > *best_total);
        if heavier {
            best = Some((key, total));
        }
    }
    best.map(|(key, _)| key)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }
}

// ===== ISSUES =====
// Field names are part of the output contract consumed by the review front end.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// "提醒" (remind) or "替换" (replace)
    pub operation: String,
    /// Replacement text; always serialized, empty for reminders
    #[serde(default)]
    pub after: String,
}

impl Suggestion {
    pub fn remind(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            after: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "issueType")]
    pub issue_type: String,
    #[serde(rename = "specificWord")]
    pub specific_word: String,
    pub sentence: String,
    pub suggestion: Suggestion,
    pub rule_id: String,
    #[serde(rename = "additionalNotes")]
    pub additional_notes: String,
}

/// How a paragraph was classified by heading detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParagraphKind {
    Body,
    /// Index into the configured heading levels (0 = level 1)
    Heading(usize),
}
