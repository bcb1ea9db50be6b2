//! Rule table loader
//!
//! House-style rules are maintained as a Markdown table:
//!
//! ```text
//! | 编号 | 类型场景 | 规则描述 | 示例 | 操作建议 |
//! |------|----------|----------|------|----------|
//! | 05-02 | 标序问题-跳序问题 | 标题序号应连续 | 一、二、三、 | 提醒 |
//! ```
//!
//! The table only annotates issues. A missing table row never stops a check
//! from firing; the check falls back to its own built-in wording.

use crate::error::Result;
use crate::storage::calculate_text_hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Operation suggested when the table does not say otherwise ("remind")
pub const DEFAULT_OPERATION: &str = "提醒";

const SEPARATOR_MARKER: &str = "---";
const FIELD_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    /// Scenario label, used as the issue type
    pub scenario: String,
    pub description: String,
    pub example: String,
    /// Suggested operation ("提醒", "替换", ...)
    pub operation: String,
}

impl Rule {
    /// Stand-in returned for ids the table does not define
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            scenario: String::new(),
            description: String::new(),
            example: String::new(),
            operation: DEFAULT_OPERATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: BTreeMap<String, Rule>,
    content_hash: String,
}

impl RuleTable {
    /// Parse a rule table from text. Never fails: rows that do not have the
    /// expected shape are skipped.
    pub fn parse(text: &str) -> Self {
        let mut rules = BTreeMap::new();
        let mut header_skipped = false;
        let mut skipped_rows = 0usize;

        for line in text.lines() {
            if !header_skipped {
                if line.contains(SEPARATOR_MARKER) {
                    header_skipped = true;
                }
                continue;
            }

            let row = line.trim();
            if !(row.starts_with('|') && row.ends_with('|')) || row.len() < 2 {
                continue;
            }

            let cells: Vec<&str> = row[1..row.len() - 1].split('|').map(str::trim).collect();
            if cells.len() != FIELD_COUNT {
                skipped_rows += 1;
                continue;
            }

            let rule = Rule {
                id: cells[0].to_string(),
                scenario: cells[1].to_string(),
                description: cells[2].to_string(),
                example: cells[3].to_string(),
                operation: cells[4].to_string(),
            };
            // later rows win
            rules.insert(rule.id.clone(), rule);
        }

        if !header_skipped {
            log::warn!("Rule table has no header separator line; no rules loaded");
        }
        log::debug!(
            "Loaded {} rules ({} malformed rows skipped)",
            rules.len(),
            skipped_rows
        );

        Self {
            rules,
            content_hash: calculate_text_hash(text),
        }
    }

    /// Read and parse a rule table file. Reading is the only fallible step.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// Rule for `id`, or a placeholder when the table does not define it
    pub fn lookup(&self, id: &str) -> Rule {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| Rule::placeholder(id))
    }

    /// Scenario label of `id`, or `fallback` when the rule is missing
    pub fn scenario_or(&self, id: &str, fallback: &str) -> String {
        self.get(id)
            .map_or_else(|| fallback.to_string(), |rule| rule.scenario.clone())
    }

    /// Description of `id`, or `fallback` when the rule is missing
    pub fn description_or(&self, id: &str, fallback: &str) -> String {
        self.get(id)
            .map_or_else(|| fallback.to_string(), |rule| rule.description.clone())
    }

    pub fn operation(&self, id: &str) -> String {
        self.get(id)
            .map_or_else(|| DEFAULT_OPERATION.to_string(), |rule| rule.operation.clone())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// SHA-256 of the text the table was parsed from
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}
