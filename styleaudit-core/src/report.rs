//! Review output
//!
//! `ReviewResult` is the contract consumed by the review front end:
//! `{"issues": [...]}`, four-space indented, non-ASCII left unescaped.
//! `ReviewReport` wraps the same issues with provenance for archiving.

use crate::error::Result;
use crate::types::Issue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub issues: Vec<Issue>,
}

impl ReviewResult {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue count per rule id, sorted by id
    pub fn counts_by_rule(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.rule_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        to_json_pretty(self)
    }
}

/// Archived form of a review: the issues plus what produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the document bytes
    pub source_hash: String,
    /// SHA-256 of the rule table text
    pub rules_hash: String,
    pub issue_count: usize,
    pub counts_by_rule: BTreeMap<String, usize>,
    pub issues: Vec<Issue>,
}

impl ReviewReport {
    pub fn new(result: &ReviewResult, source_hash: &str, rules_hash: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            source_hash: source_hash.to_string(),
            rules_hash: rules_hash.to_string(),
            issue_count: result.len(),
            counts_by_rule: result.counts_by_rule(),
            issues: result.issues.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        to_json_pretty(self)
    }
}

/// serde_json with a four-space indent; non-ASCII stays literal UTF-8
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Suggestion;
    use serde_json::Value;

    fn issue(rule_id: &str) -> Issue {
        Issue {
            issue_type: "段落-自然段左空两字".to_string(),
            specific_word: "正文".to_string(),
            sentence: "正文".to_string(),
            suggestion: Suggestion::remind("提醒"),
            rule_id: rule_id.to_string(),
            additional_notes: "段落首行应当左空二字".to_string(),
        }
    }

    #[test]
    fn contract_shape_and_field_names() {
        let json = ReviewResult::new(vec![issue("14-02")]).to_json_pretty().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let first = &value["issues"][0];

        assert_eq!(first["issueType"], "段落-自然段左空两字");
        assert_eq!(first["specificWord"], "正文");
        assert_eq!(first["sentence"], "正文");
        assert_eq!(first["suggestion"]["operation"], "提醒");
        assert_eq!(first["suggestion"]["after"], "");
        assert_eq!(first["rule_id"], "14-02");
        assert_eq!(first["additionalNotes"], "段落首行应当左空二字");
    }

    #[test]
    fn four_space_indent_and_unescaped_chinese() {
        let json = ReviewResult::new(vec![issue("14-02")]).to_json_pretty().unwrap();
        assert!(json.starts_with("{\n    \"issues\": [\n        {"));
        assert!(json.contains("正文"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn empty_result_serializes_empty_list() {
        let json = ReviewResult::default().to_json_pretty().unwrap();
        assert_eq!(json, "{\n    \"issues\": []\n}");
    }

    #[test]
    fn report_counts_are_sorted_by_rule() {
        let result = ReviewResult::new(vec![issue("14-02"), issue("05-02"), issue("14-02")]);
        let report = ReviewReport::new(&result, "abc", "def");
        assert_eq!(report.issue_count, 3);
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        let counts: Vec<(&str, usize)> = report
            .counts_by_rule
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(counts, vec![("05-02", 1), ("14-02", 2)]);
        // issue order is untouched
        assert_eq!(report.issues[1].rule_id, "05-02");
    }
}
