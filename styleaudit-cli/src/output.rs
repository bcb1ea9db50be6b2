//! Output paths and review file rendering

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use styleaudit_core::report::to_json_pretty;
use styleaudit_core::{
    Document, DocumentSource, DocumentValidator, ReviewReport, ValidationOptions,
    ValidationOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Bare `{"issues": [...]}` consumed by the review front end
    #[default]
    Issues,
    /// Issues wrapped with hashes, counts and a timestamp
    Report,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "issues" => Some(Self::Issues),
            "report" => Some(Self::Report),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::Report => "report",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewSettings {
    pub options: ValidationOptions,
    pub format: OutputFormat,
    /// Also write the parsed document next to the review
    pub dump_document: bool,
}

fn input_stem(input: &Path) -> &str {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
}

/// `<stem>_review.json`, in `output_dir` when given, otherwise the working directory
pub fn default_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    review_path(input_stem(input), output_dir)
}

/// `<stem>_<n>_review.json`, for inputs sharing a stem with an earlier one
pub fn numbered_output_path(input: &Path, output_dir: Option<&Path>, n: usize) -> PathBuf {
    review_path(&format!("{}_{}", input_stem(input), n), output_dir)
}

fn review_path(stem: &str, output_dir: Option<&Path>) -> PathBuf {
    let file_name = format!("{stem}_review.json");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// `<name>_document.json` beside the review file, named after it
pub fn document_dump_path(review_path: &Path) -> PathBuf {
    let file_name = review_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output.json");
    let base = file_name
        .strip_suffix("_review.json")
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name);
    review_path.with_file_name(format!("{base}_document.json"))
}

pub fn render(outcome: &ValidationOutcome, format: OutputFormat, rules_hash: &str) -> Result<String> {
    let json = match format {
        OutputFormat::Issues => outcome.result.to_json_pretty()?,
        OutputFormat::Report => {
            ReviewReport::new(&outcome.result, &outcome.source_hash, rules_hash).to_json_pretty()?
        }
    };
    Ok(json)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn save_review(
    outcome: &ValidationOutcome,
    format: OutputFormat,
    rules_hash: &str,
    path: &Path,
) -> Result<()> {
    let json = render(outcome, format, rules_hash)?;
    write_file(path, &json)
}

pub fn save_document(document: &Document, path: &Path) -> Result<()> {
    let json = to_json_pretty(document)?;
    write_file(path, &json)
}

/// Validate one file and write its review (and optional document dump)
pub fn review_file(
    validator: &DocumentValidator,
    input: &Path,
    output: &Path,
    settings: &ReviewSettings,
) -> Result<ValidationOutcome> {
    review_source(validator, DocumentSource::from_path(input), output, settings)
        .with_context(|| format!("Failed to validate {}", input.display()))
}

/// Validate any source; it is read exactly once, even when a dump is requested
pub fn review_source(
    validator: &DocumentValidator,
    source: DocumentSource,
    output: &Path,
    settings: &ReviewSettings,
) -> Result<ValidationOutcome> {
    let source = if settings.dump_document {
        let bytes = source.into_bytes()?;
        let document = validator.preprocessor().process(&bytes);
        save_document(&document, &document_dump_path(output))?;
        DocumentSource::from(bytes)
    } else {
        source
    };

    let outcome = validator.validate_with_options(source, &settings.options)?;
    save_review(&outcome, settings.format, validator.rules().content_hash(), output)?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Cursor;
    use styleaudit_core::{AuditConfig, RuleTable};

    const MARKUP: &str = "<html><body>\
        <p class=MsoNormal><span style='font-family:黑体'>一、总则</span></p>\
        <p class=MsoNormal><span style='font-family:仿宋'>正文没有缩进</span></p>\
        </body></html>";

    fn validator() -> DocumentValidator {
        DocumentValidator::new(AuditConfig::default(), RuleTable::default()).unwrap()
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("report"), Some(OutputFormat::Report));
        assert_eq!(OutputFormat::from_name("issues").unwrap().name(), "issues");
        assert_eq!(OutputFormat::from_name("graph"), None);
        assert_eq!(OutputFormat::default(), OutputFormat::Issues);
    }

    #[test]
    fn test_default_output_paths() {
        let input = Path::new("/tmp/docs/通知.html");
        assert_eq!(default_output_path(input, None), PathBuf::from("通知_review.json"));
        assert_eq!(
            default_output_path(input, Some(Path::new("out"))),
            PathBuf::from("out/通知_review.json")
        );
        assert_eq!(
            numbered_output_path(input, Some(Path::new("out")), 2),
            PathBuf::from("out/通知_2_review.json")
        );
        assert_eq!(
            document_dump_path(Path::new("out/通知_2_review.json")),
            PathBuf::from("out/通知_2_document.json")
        );
        assert_eq!(
            document_dump_path(Path::new("custom.json")),
            PathBuf::from("custom_document.json")
        );
    }

    #[test]
    fn test_review_file_writes_issues_and_dump() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("notice.html");
        fs::write(&input, MARKUP).unwrap();
        let output = temp_dir.path().join("nested").join("notice_review.json");

        let settings = ReviewSettings {
            dump_document: true,
            ..Default::default()
        };
        let outcome = review_file(&validator(), &input, &output, &settings).unwrap();
        assert_eq!(outcome.result.len(), 1);

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["issues"][0]["rule_id"], "14-02");

        let dump = temp_dir.path().join("nested").join("notice_document.json");
        let document: Value = serde_json::from_str(&fs::read_to_string(dump).unwrap()).unwrap();
        assert_eq!(document["paragraphs"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_dump_reads_the_source_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("stream_review.json");
        // a reader can only be drained once
        let source = DocumentSource::from_reader(Cursor::new(MARKUP.as_bytes().to_vec()));

        let settings = ReviewSettings {
            dump_document: true,
            ..Default::default()
        };
        let outcome = review_source(&validator(), source, &output, &settings).unwrap();
        assert_eq!(outcome.result.len(), 1);

        let dump = temp_dir.path().join("stream_document.json");
        let document: Value = serde_json::from_str(&fs::read_to_string(dump).unwrap()).unwrap();
        assert_eq!(document["paragraphs"].as_array().unwrap().len(), 2);
        assert!(output.exists());
    }

    #[test]
    fn test_report_format_carries_envelope() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("notice.html");
        fs::write(&input, MARKUP).unwrap();
        let output = temp_dir.path().join("notice_review.json");

        let settings = ReviewSettings {
            format: OutputFormat::Report,
            ..Default::default()
        };
        review_file(&validator(), &input, &output, &settings).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["issue_count"], 1);
        assert_eq!(written["counts_by_rule"]["14-02"], 1);
        assert!(written["source_hash"].is_string());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("missing_review.json");
        let result = review_file(
            &validator(),
            &temp_dir.path().join("missing.html"),
            &output,
            &ReviewSettings::default(),
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
