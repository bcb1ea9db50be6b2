use crate::config::{HeadingLevelConfig, NumeralSystem};
use crate::error::{AuditError, Result};
use crate::types::{Document, Paragraph, ParagraphKind};
use regex::Regex;

/// A paragraph recognised as a numbered heading
#[derive(Debug, Clone)]
pub struct HeadingEntry<'a> {
    /// Position in `Document::paragraphs`
    pub index: usize,
    pub paragraph: &'a Paragraph,
    /// Capture group 1 of the level pattern ("三", "12")
    pub numeral: String,
    /// Whole matched prefix ("三、", "（十一）", "12.")
    pub prefix: String,
    /// `None` when the numeral is outside the convertible range
    pub value: Option<u32>,
}

impl HeadingEntry<'_> {
    pub fn text(&self) -> &str {
        &self.paragraph.text
    }
}

/// Result of running the classifier over a whole document
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    /// One entry per paragraph, in document order
    pub kinds: Vec<ParagraphKind>,
    /// Headings per configured level, each in document order
    pub levels: Vec<Vec<HeadingEntry<'a>>>,
}

impl<'a> Classification<'a> {
    pub fn heading_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Heading entry for the paragraph at `index`, if it is one
    pub fn heading_at(&self, index: usize) -> Option<&HeadingEntry<'a>> {
        match self.kinds.get(index)? {
            ParagraphKind::Heading(level) => self.levels[*level]
                .iter()
                .find(|entry| entry.index == index),
            ParagraphKind::Body => None,
        }
    }
}

struct CompiledLevel {
    name: String,
    regex: Regex,
    numerals: NumeralSystem,
}

/// Matches paragraph openings against the configured numbering patterns
pub struct HeadingClassifier {
    levels: Vec<CompiledLevel>,
}

impl HeadingClassifier {
    /// Compile every level pattern up front; a bad pattern is a config error
    pub fn new(levels: &[HeadingLevelConfig]) -> Result<Self> {
        let levels = levels
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let regex = Regex::new(&level.pattern).map_err(|source| {
                    AuditError::InvalidPattern {
                        level: index + 1,
                        source,
                    }
                })?;
                Ok(CompiledLevel {
                    name: level.name.clone(),
                    regex,
                    numerals: level.numerals,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { levels })
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// First level whose pattern matches the start of the trimmed text,
    /// with the numeral token and the matched prefix
    pub fn match_text(&self, text: &str) -> Option<(usize, String, String)> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.levels.iter().enumerate().find_map(|(index, level)| {
            let captures = level.regex.captures(text)?;
            let prefix = captures.get(0)?;
            // patterns are documented as anchored; enforce it for hand-written ones
            if prefix.start() != 0 {
                return None;
            }
            let numeral = captures
                .get(1)
                .map_or(prefix.as_str(), |m| m.as_str())
                .to_string();
            Some((index, numeral, prefix.as_str().to_string()))
        })
    }

    pub fn classify<'a>(&self, document: &'a Document) -> Classification<'a> {
        let mut kinds = Vec::with_capacity(document.len());
        let mut levels: Vec<Vec<HeadingEntry<'a>>> = self.levels.iter().map(|_| Vec::new()).collect();

        for (index, paragraph) in document.paragraphs.iter().enumerate() {
            let Some((level_index, numeral, prefix)) = self.match_text(&paragraph.text) else {
                kinds.push(ParagraphKind::Body);
                continue;
            };

            let level = &self.levels[level_index];
            let value = level.numerals.to_int(&numeral);
            if value.is_none() {
                log::warn!(
                    "Unconvertible {} numeral '{}' in paragraph {}",
                    level.name,
                    numeral,
                    index + 1
                );
            }

            kinds.push(ParagraphKind::Heading(level_index));
            levels[level_index].push(HeadingEntry {
                index,
                paragraph,
                numeral,
                prefix,
                value,
            });
        }

        for (level, entries) in self.levels.iter().zip(&levels) {
            log::debug!("{}: {} headings", level.name, entries.len());
        }

        Classification { kinds, levels }
    }
}
