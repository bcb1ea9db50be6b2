//! Heading numbering continuity
//!
//! Each level is its own sequence: 一、 二、 三、 stays continuous no matter
//! how many （一） or 1. headings sit between them, and sub-level numbering
//! does not restart under a new parent.

use super::engine::{table_issue, AuditContext, AuditRule};
use super::heading_detection::HeadingEntry;
use crate::config::NumeralSystem;
use crate::types::Issue;

const FALLBACK_SCENARIO: &str = "标序问题-跳序问题";

pub struct NumberingContinuityRule;

impl AuditRule for NumberingContinuityRule {
    fn name(&self) -> &str {
        "NumberingContinuity"
    }

    fn check_document(&self, ctx: &AuditContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (level_index, entries) in ctx.classification.levels.iter().enumerate() {
            let Some(level) = ctx.config.heading_levels.get(level_index) else {
                continue;
            };

            for pair in entries.windows(2) {
                let (current, next) = (&pair[0], &pair[1]);
                // a side that failed conversion was already logged by the classifier
                let (Some(current_value), Some(next_value)) = (current.value, next.value) else {
                    continue;
                };
                let Some(expected_value) = current_value.checked_add(1) else {
                    continue;
                };
                if next_value == expected_value {
                    continue;
                }

                let expected_prefix = expected_prefix(next, level.numerals, expected_value);
                let fallback_notes = format!(
                    "标题序号不连续，期望是 {}，实际是 {}",
                    expected_prefix, next.prefix
                );

                issues.push(table_issue(
                    ctx.rules,
                    &level.sequence_rule_id,
                    FALLBACK_SCENARIO,
                    next.prefix.clone(),
                    next.text().to_string(),
                    ctx.rules
                        .description_or(&level.sequence_rule_id, &fallback_notes),
                ));
            }
        }

        issues
    }
}

/// The actual prefix with its numeral swapped for the expected one
fn expected_prefix(entry: &HeadingEntry<'_>, numerals: NumeralSystem, value: u32) -> String {
    let rendered = numerals.render(value);
    if entry.numeral.is_empty() {
        return rendered;
    }
    entry.prefix.replacen(&entry.numeral, &rendered, 1)
}
