//! Inline style extraction
//!
//! Reads the handful of CSS declarations the word-processor HTML export puts
//! in `style` attributes. Nothing here fails: a missing or unparseable
//! declaration is reported as `None` and the caller decides what that means.

use crate::types::{Font, ParagraphFormat};
use regex::Regex;
use std::sync::LazyLock;

// style="..." | style='...' | style=bare
static STYLE_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

static BOLD_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:b|strong)(?:\s[^>]*)?>").unwrap());

/// One `name: value` pair from a style attribute, name lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

/// All declarations of all style attributes in `fragment`, in source order
pub fn declarations(fragment: &str) -> Vec<Declaration> {
    let mut result = Vec::new();

    for cap in STYLE_ATTR_REGEX.captures_iter(fragment) {
        let Some(body) = cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3)) else {
            continue;
        };

        // the entity's own ';' would otherwise split a quoted family name
        let body = body.as_str().replace("&quot;", "\"");
        for declaration in body.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let name = name.trim().to_ascii_lowercase();
                if name.is_empty() {
                    continue;
                }
                result.push(Declaration {
                    name,
                    value: value.trim().to_string(),
                });
            }
        }
    }

    result
}

fn first_value<'a>(declarations: &'a [Declaration], name: &str) -> Option<&'a str> {
    declarations
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.value.as_str())
}

fn unquote(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

/// Leading numeric part of a CSS length ("21.0pt" -> 21.0, "-1.5" -> -1.5)
fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || ((*c == '-' || *c == '+') && *i == 0)))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Extracts run and paragraph attributes from markup fragments
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleExtractor {
    /// Map `font-weight` and `<b>`/`<strong>` to a bold flag. Off by default:
    /// the export does not reliably mark bold at run level.
    pub detect_bold: bool,
}

impl StyleExtractor {
    pub fn new(detect_bold: bool) -> Self {
        Self { detect_bold }
    }

    /// Font of a run fragment
    pub fn extract_font(&self, fragment: &str) -> Font {
        let declarations = declarations(fragment);

        let name = first_value(&declarations, "font-family")
            .map(unquote)
            .filter(|name| !name.is_empty());

        let size = first_value(&declarations, "font-size").and_then(parse_point_size);

        let bold = if self.detect_bold {
            first_value(&declarations, "font-weight")
                .and_then(parse_font_weight)
                .or_else(|| BOLD_TAG_REGEX.is_match(fragment).then_some(true))
        } else {
            None
        };

        Font::new(name, bold, size)
    }

    /// Indentation of a paragraph, read from its opening `<p>` tag only
    pub fn extract_paragraph_format(&self, opening_tag: &str) -> ParagraphFormat {
        let declarations = declarations(opening_tag);

        ParagraphFormat {
            first_line_indent: first_value(&declarations, "mso-char-indent-count")
                .and_then(leading_number)
                .map(|n| n.trunc() as i32),
            left_indent: first_value(&declarations, "margin-left")
                .and_then(leading_number)
                .map(|n| n.trunc() as i32),
        }
    }
}

/// "16.0pt" -> 16; anything not expressed in points is unknown
fn parse_point_size(value: &str) -> Option<u32> {
    let value = value.trim();
    let number = value
        .strip_suffix("pt")
        .or_else(|| value.strip_suffix("PT"))?
        .trim()
        .parse::<f64>()
        .ok()?;
    (number.is_finite() && number >= 0.0).then(|| number.trunc() as u32)
}

fn parse_font_weight(value: &str) -> Option<bool> {
    let value = unquote(value).to_ascii_lowercase();
    match value.as_str() {
        "bold" | "bolder" => Some(true),
        "normal" | "lighter" => Some(false),
        other => other.parse::<u32>().ok().map(|weight| weight >= 600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_font_family_and_size() {
        let font = StyleExtractor::default()
            .extract_font("<span style='font-size:16.0pt;font-family:黑体'>一、总则</span>");
        assert_eq!(font.name.as_deref(), Some("黑体"));
        assert_eq!(font.size, Some(16));
        assert_eq!(font.bold, None);
    }

    #[test]
    fn vendor_prefixed_family_is_not_the_family() {
        let font = StyleExtractor::default().extract_font(
            r#"<span style="mso-ascii-font-family:Calibri;font-family:&quot;Times New Roman&quot;">x</span>"#,
        );
        assert_eq!(font.name.as_deref(), Some("Times New Roman"));
    }

    #[test]
    fn multiline_style_attribute() {
        let font = StyleExtractor::default()
            .extract_font("<span lang=EN-US style='font-size:15.5pt;\r\nfont-family:仿宋_GB2312;mso-hansi-font-family:Arial'>1.</span>");
        assert_eq!(font.name.as_deref(), Some("仿宋_GB2312"));
        assert_eq!(font.size, Some(15));
    }

    #[test]
    fn missing_or_non_point_size_is_unknown() {
        let extractor = StyleExtractor::default();
        assert_eq!(extractor.extract_font("<span>x</span>").size, None);
        assert_eq!(extractor.extract_font("<span style='font-size:12px'>x</span>").size, None);
        assert_eq!(extractor.extract_font("<span style='font-size:largept'>x</span>").size, None);
        assert_eq!(extractor.extract_font("<span>x</span>").name, None);
    }

    #[test]
    fn bold_stays_unknown_unless_detection_enabled() {
        let fragment = "<span style='font-weight:bold;font-family:SimSun'>x</span>";
        assert_eq!(StyleExtractor::new(false).extract_font(fragment).bold, None);
        assert_eq!(StyleExtractor::new(true).extract_font(fragment).bold, Some(true));
        assert_eq!(
            StyleExtractor::new(true)
                .extract_font("<span style='font-weight:400'>x</span>")
                .bold,
            Some(false)
        );
        assert_eq!(
            StyleExtractor::new(true)
                .extract_font("<span><b>x</b></span>")
                .bold,
            Some(true)
        );
        assert_eq!(StyleExtractor::new(true).extract_font("<span>x</span>").bold, None);
    }

    #[test]
    fn paragraph_indent_is_truncated() {
        let format = StyleExtractor::default().extract_paragraph_format(
            "<p class=MsoNormal style='text-indent:32.0pt;mso-char-indent-count:2.0;margin-left:21.5pt'>",
        );
        assert_eq!(format.first_line_indent, Some(2));
        assert_eq!(format.left_indent, Some(21));
    }

    #[test]
    fn absent_indent_differs_from_zero() {
        let extractor = StyleExtractor::default();
        let absent = extractor.extract_paragraph_format("<p class=MsoNormal>");
        assert_eq!(absent.first_line_indent, None);
        assert_eq!(absent.left_indent, None);

        let zero = extractor
            .extract_paragraph_format("<p class=MsoNormal style='mso-char-indent-count:0'>");
        assert_eq!(zero.first_line_indent, Some(0));
    }

    #[test]
    fn negative_indent_is_kept() {
        let format = StyleExtractor::default()
            .extract_paragraph_format("<p class=MsoNormal style=\"mso-char-indent-count:-1.5\">");
        assert_eq!(format.first_line_indent, Some(-1));
    }
}
