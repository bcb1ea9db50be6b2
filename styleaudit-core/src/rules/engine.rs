use crate::config::AuditConfig;
use crate::rule_table::RuleTable;
use crate::types::*;

use super::heading_detection::Classification;
use super::indentation::BodyIndentationRule;
use super::numbering::NumberingContinuityRule;
use super::typography::HeadingTypographyRule;

/// Everything a check may look at. Borrowed for the duration of one audit.
pub struct AuditContext<'a> {
    pub document: &'a Document,
    pub classification: &'a Classification<'a>,
    pub rules: &'a RuleTable,
    pub config: &'a AuditConfig,
}

impl AuditContext<'_> {
    pub fn kind_of(&self, index: usize) -> ParagraphKind {
        self.classification
            .kinds
            .get(index)
            .copied()
            .unwrap_or(ParagraphKind::Body)
    }
}

/// A named check in the audit pipeline.
///
/// Paragraph-level findings come out in document order; document-level
/// findings (sequences across paragraphs) are appended after all of them.
pub trait AuditRule: Send + Sync {
    fn name(&self) -> &str;

    fn check_paragraph(
        &self,
        _ctx: &AuditContext<'_>,
        _index: usize,
        _paragraph: &Paragraph,
    ) -> Vec<Issue> {
        Vec::new()
    }

    fn check_document(&self, _ctx: &AuditContext<'_>) -> Vec<Issue> {
        Vec::new()
    }
}

/// Instantiate a check from its pipeline name
pub fn rule_by_name(name: &str) -> Option<Box<dyn AuditRule>> {
    match name {
        "BodyIndentation" => Some(Box::new(BodyIndentationRule)),
        "HeadingTypography" => Some(Box::new(HeadingTypographyRule)),
        "NumberingContinuity" => Some(Box::new(NumberingContinuityRule)),
        _ => None,
    }
}

pub struct RuleEngine {
    rules: Vec<Box<dyn AuditRule>>,
}

impl RuleEngine {
    /// Build the pipeline described by `config.pipeline`, in order
    pub fn from_config(config: &AuditConfig) -> Self {
        let mut rules = Vec::new();

        for rule_config in &config.pipeline.rules {
            if !rule_config.enabled {
                log::debug!("Skipping disabled rule: {}", rule_config.name);
                continue;
            }
            match rule_by_name(&rule_config.name) {
                Some(rule) => rules.push(rule),
                None => log::warn!("Unknown rule: {}. Skipping...", rule_config.name),
            }
        }

        Self { rules }
    }

    pub fn with_rules(rules: Vec<Box<dyn AuditRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every check. Paragraph issues first (document order, then
    /// pipeline order within a paragraph), then document-level issues.
    pub fn run(&self, ctx: &AuditContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (index, paragraph) in ctx.document.paragraphs.iter().enumerate() {
            if paragraph.text.trim().is_empty() {
                continue;
            }
            for rule in &self.rules {
                issues.extend(rule.check_paragraph(ctx, index, paragraph));
            }
        }

        for rule in &self.rules {
            let found = rule.check_document(ctx);
            log::debug!("{}: {} document-level issues", rule.name(), found.len());
            issues.extend(found);
        }

        issues
    }
}

/// First `max_chars` characters of `text`
pub(crate) fn leading_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Issue whose type and operation come from the rule table when it has the rule
pub(crate) fn table_issue(
    rules: &RuleTable,
    rule_id: &str,
    fallback_scenario: &str,
    specific_word: String,
    sentence: String,
    additional_notes: String,
) -> Issue {
    Issue {
        issue_type: rules.scenario_or(rule_id, fallback_scenario),
        specific_word,
        sentence,
        suggestion: Suggestion::remind(rules.operation(rule_id)),
        rule_id: rule_id.to_string(),
        additional_notes,
    }
}
