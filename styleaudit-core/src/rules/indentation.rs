use super::engine::{leading_chars, table_issue, AuditContext, AuditRule};
use crate::types::{Issue, Paragraph, ParagraphKind};

const FIRST_LINE_SCENARIO: &str = "段落-自然段左空两字";
const FIRST_LINE_NOTES: &str = "段落首行应当左空二字";
const LEFT_INDENT_SCENARIO: &str = "段落- 回行顶格";
const LEFT_INDENT_NOTES: &str = "段落回行应顶格（段落整体左侧不应有额外缩进）";

/// Body paragraphs: first line indented two characters, wrapped lines flush left
pub struct BodyIndentationRule;

impl AuditRule for BodyIndentationRule {
    fn name(&self) -> &str {
        "BodyIndentation"
    }

    fn check_paragraph(
        &self,
        ctx: &AuditContext<'_>,
        index: usize,
        paragraph: &Paragraph,
    ) -> Vec<Issue> {
        if ctx.kind_of(index) != ParagraphKind::Body {
            return Vec::new();
        }
        let text = paragraph.text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let body = &ctx.config.body;
        let format = &paragraph.paragraph_format;
        let mut issues = Vec::new();

        // absent counts as wrong
        if format.first_line_indent != Some(body.first_line_indent_chars) {
            issues.push(table_issue(
                ctx.rules,
                &body.indent_rule_id,
                FIRST_LINE_SCENARIO,
                leading_chars(text, body.snippet_chars),
                text.to_string(),
                ctx.rules.description_or(&body.indent_rule_id, FIRST_LINE_NOTES),
            ));
        }

        if body.check_left_indent {
            if let Some(left) = format.left_indent {
                if left > body.left_indent_tolerance {
                    issues.push(table_issue(
                        ctx.rules,
                        &body.left_indent_rule_id,
                        LEFT_INDENT_SCENARIO,
                        leading_chars(text, body.snippet_chars),
                        text.to_string(),
                        ctx.rules
                            .description_or(&body.left_indent_rule_id, LEFT_INDENT_NOTES),
                    ));
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;
    use crate::rule_table::RuleTable;
    use crate::rules::heading_detection::HeadingClassifier;
    use crate::types::*;

    fn paragraph(text: &str, first: Option<i32>, left: Option<i32>) -> Paragraph {
        Paragraph::new(
            vec![Run::new(text, "", Font::default())],
            ParagraphFormat {
                first_line_indent: first,
                left_indent: left,
            },
        )
    }

    fn check_with(config: &AuditConfig, paragraph: Paragraph) -> Vec<Issue> {
        let document = Document::new(vec![paragraph]);
        let classification = HeadingClassifier::new(&config.heading_levels)
            .unwrap()
            .classify(&document);
        let rules = RuleTable::default();
        let ctx = AuditContext {
            document: &document,
            classification: &classification,
            rules: &rules,
            config,
        };
        BodyIndentationRule.check_paragraph(&ctx, 0, &document.paragraphs[0])
    }

    fn check(paragraph: Paragraph) -> Vec<Issue> {
        check_with(&AuditConfig::default(), paragraph)
    }

    #[test]
    fn missing_first_line_indent_is_flagged() {
        let issues = check(paragraph("根据有关规定，现将工作安排通知如下。", None, None));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_id, "14-02");
        assert_eq!(issues[0].issue_type, FIRST_LINE_SCENARIO);
        assert_eq!(issues[0].additional_notes, FIRST_LINE_NOTES);
    }

    #[test]
    fn two_character_indent_passes() {
        assert!(check(paragraph("正文", Some(2), None)).is_empty());
        assert_eq!(check(paragraph("正文", Some(0), None)).len(), 1);
        assert_eq!(check(paragraph("正文", Some(3), None)).len(), 1);
    }

    #[test]
    fn snippet_is_first_twenty_characters_of_trimmed_text() {
        let text = "  根据《中华人民共和国国家通用语言文字法》和有关规定，制定本办法。";
        let issues = check(paragraph(text, None, None));
        assert_eq!(issues[0].specific_word, "根据《中华人民共和国国家通用语言文字法》");
        assert_eq!(issues[0].specific_word.chars().count(), 20);
        assert_eq!(issues[0].sentence, text.trim());
    }

    #[test]
    fn headings_are_not_indentation_checked() {
        assert!(check(paragraph("一、总则", None, Some(20))).is_empty());
    }

    #[test]
    fn left_indent_only_when_enabled() {
        assert_eq!(check(paragraph("正文", Some(2), Some(21))).len(), 0);

        let mut config = AuditConfig::default();
        config.body.check_left_indent = true;
        let issues = check_with(&config, paragraph("正文", None, Some(21)));
        let ids: Vec<&str> = issues.iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["14-02", "14-03"]);
        assert_eq!(issues[1].issue_type, LEFT_INDENT_SCENARIO);

        assert!(check_with(&config, paragraph("正文", Some(2), Some(0))).is_empty());
        assert!(check_with(&config, paragraph("正文", Some(2), None)).is_empty());
        assert!(check_with(&config, paragraph("正文", Some(2), Some(-4))).is_empty());
    }
}
