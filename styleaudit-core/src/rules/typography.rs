use super::engine::{leading_chars, table_issue, AuditContext, AuditRule};
use crate::config::HeadingLevelConfig;
use crate::types::{Issue, Paragraph, ParagraphKind};

const FALLBACK_DESCRIPTION: &str = "标题格式问题";
const UNKNOWN_FONT: &str = "未知";

/// Checks the dominant font family and weight of every heading
pub struct HeadingTypographyRule;

impl AuditRule for HeadingTypographyRule {
    fn name(&self) -> &str {
        "HeadingTypography"
    }

    fn check_paragraph(
        &self,
        ctx: &AuditContext<'_>,
        index: usize,
        paragraph: &Paragraph,
    ) -> Vec<Issue> {
        let ParagraphKind::Heading(level_index) = ctx.kind_of(index) else {
            return Vec::new();
        };
        let Some(level) = ctx.config.heading_levels.get(level_index) else {
            return Vec::new();
        };

        let actual_font = paragraph.font_name();
        let actual_bold = paragraph.bold();

        let font_ok = font_matches(actual_font, &level.expected_fonts);
        let bold_ok = bold_matches(level.expected_bold, actual_bold)
            || (level.expected_bold == Some(true)
                && is_inherently_bold(actual_font, &ctx.config.inherently_bold_fonts));

        if font_ok && bold_ok {
            return Vec::new();
        }

        let mut notes = Vec::new();
        if !font_ok {
            notes.push(font_note(level, actual_font));
        }
        if !bold_ok {
            notes.push(bold_note(level.expected_bold, actual_bold));
        }

        let text = paragraph.text.trim();
        let prefix = text.split(' ').next().unwrap_or(text);
        let description = ctx
            .rules
            .description_or(&level.font_rule_id, FALLBACK_DESCRIPTION);

        vec![table_issue(
            ctx.rules,
            &level.font_rule_id,
            &format!("格式问题-{}", level.font_rule_id),
            leading_chars(prefix, ctx.config.typography.prefix_max_chars),
            text.to_string(),
            format!("{}: {}", description, notes.join("; ")),
        )]
    }
}

/// Case-insensitive substring match of any expected family
fn font_matches(actual: Option<&str>, expected: &[String]) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let actual = actual.to_lowercase();
    expected
        .iter()
        .any(|family| actual.contains(&family.to_lowercase()))
}

fn bold_matches(expected: Option<bool>, actual: Option<bool>) -> bool {
    match expected {
        Some(true) => actual == Some(true),
        Some(false) => actual != Some(true),
        None => true,
    }
}

fn is_inherently_bold(actual: Option<&str>, bold_fonts: &[String]) -> bool {
    actual.is_some_and(|name| {
        let name = name.to_lowercase();
        bold_fonts.iter().any(|font| font.to_lowercase() == name)
    })
}

fn font_note(level: &HeadingLevelConfig, actual: Option<&str>) -> String {
    format!(
        "字体应为 '{}' 系列, 实际主要字体为 '{}'",
        level.expected_fonts.join("/"),
        actual.unwrap_or(UNKNOWN_FONT)
    )
}

fn bold_note(expected: Option<bool>, actual: Option<bool>) -> String {
    let expected = match expected {
        Some(true) => "加粗",
        Some(false) => "不加粗",
        None => "未指定",
    };
    let actual = match actual {
        Some(true) => "加粗",
        Some(false) => "不加粗",
        None => "未明确",
    };
    format!("字体应 {}, 实际 {}", expected, actual)
}
