use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_task_expiry_seconds() -> u64 {
    7200 // two hours, matching the upload service's task lifetime
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Heading levels in priority order; the first matching pattern wins
    #[serde(default = "default_heading_levels")]
    pub heading_levels: Vec<HeadingLevelConfig>,
    /// Fonts whose glyphs are heavy enough to satisfy an expected-bold check
    #[serde(default = "default_inherently_bold_fonts")]
    pub inherently_bold_fonts: Vec<String>,
    #[serde(default)]
    pub body: BodyTextConfig,
    #[serde(default)]
    pub typography: TypographyConfig,
    #[serde(default)]
    pub style: StyleConfig,
    /// Pipeline configuration - defines which checks run and in what order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// How long finished batch tasks are kept before a sweep removes them
    #[serde(default = "default_task_expiry_seconds")]
    pub task_expiry_seconds: u64,
}

/// How a heading level's numeral token is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeralSystem {
    /// 一, 二, ... 二十
    Chinese,
    /// 1, 2, 3, ...
    Arabic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingLevelConfig {
    /// Display name for logs ("一级标题", "level 1", ...)
    pub name: String,
    /// Anchored regex; capture group 1 is the numeral token
    pub pattern: String,
    pub numerals: NumeralSystem,
    /// Rule id reported for numbering gaps
    pub sequence_rule_id: String,
    /// Rule id reported for font/weight violations
    pub font_rule_id: String,
    /// Accepted families; matched case-insensitively as substrings
    pub expected_fonts: Vec<String>,
    /// `None` leaves weight unchecked
    #[serde(default)]
    pub expected_bold: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyTextConfig {
    /// Required `mso-char-indent-count` for the first line
    #[serde(default = "default_first_line_indent_chars")]
    pub first_line_indent_chars: i32,
    /// Also flag body paragraphs carrying an extra left margin
    #[serde(default)]
    pub check_left_indent: bool,
    /// Left indent above this value is flagged
    #[serde(default)]
    pub left_indent_tolerance: i32,
    #[serde(default = "default_indent_rule_id")]
    pub indent_rule_id: String,
    #[serde(default = "default_left_indent_rule_id")]
    pub left_indent_rule_id: String,
    /// Characters of trimmed text quoted as the issue's specific word
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
}

fn default_first_line_indent_chars() -> i32 {
    2
}

fn default_indent_rule_id() -> String {
    "14-02".to_string()
}

fn default_left_indent_rule_id() -> String {
    "14-03".to_string()
}

fn default_snippet_chars() -> usize {
    20
}

impl Default for BodyTextConfig {
    fn default() -> Self {
        Self {
            first_line_indent_chars: default_first_line_indent_chars(),
            check_left_indent: false,
            left_indent_tolerance: 0,
            indent_rule_id: default_indent_rule_id(),
            left_indent_rule_id: default_left_indent_rule_id(),
            snippet_chars: default_snippet_chars(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographyConfig {
    /// Cap on the heading prefix quoted in font issues
    #[serde(default = "default_prefix_max_chars")]
    pub prefix_max_chars: usize,
}

fn default_prefix_max_chars() -> usize {
    15
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            prefix_max_chars: default_prefix_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Read `font-weight` / `<b>` into run bold flags (otherwise bold stays unknown)
    #[serde(default)]
    pub detect_bold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// List of checks to run in order
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the check
    pub name: String,
    /// Whether this check is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RuleConfig {
    pub fn enabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleConfig::enabled("BodyIndentation"),
                RuleConfig::enabled("HeadingTypography"),
                RuleConfig::enabled("NumberingContinuity"),
            ],
        }
    }
}

// Chinese ordinal with an optional second digit (十一 .. 十九, 二十)
const CHINESE_ORDINAL: &str = "[一二三四五六七八九十]+(?:[一二三四五六七八九])?";

fn fangsong_fonts() -> Vec<String> {
    vec![
        "仿宋".to_string(),
        "FangSong".to_string(),
        "FangSong_GB2312".to_string(),
    ]
}

fn default_heading_levels() -> Vec<HeadingLevelConfig> {
    vec![
        HeadingLevelConfig {
            name: "一级标题".to_string(), // 一、
            pattern: format!("^({CHINESE_ORDINAL})、"),
            numerals: NumeralSystem::Chinese,
            sequence_rule_id: "05-02".to_string(),
            font_rule_id: "06-05".to_string(),
            expected_fonts: vec!["黑体".to_string(), "SimHei".to_string()],
            expected_bold: Some(true),
        },
        HeadingLevelConfig {
            name: "二级标题".to_string(), // （一）
            pattern: format!("^[（(]({CHINESE_ORDINAL})[)）]"),
            numerals: NumeralSystem::Chinese,
            sequence_rule_id: "05-03".to_string(),
            font_rule_id: "06-03".to_string(),
            expected_fonts: vec![
                "楷体".to_string(),
                "KaiTi".to_string(),
                "STKaiti".to_string(),
            ],
            expected_bold: Some(false),
        },
        HeadingLevelConfig {
            name: "三级标题".to_string(), // 1.
            pattern: r"^(\d+)\.".to_string(),
            numerals: NumeralSystem::Arabic,
            sequence_rule_id: "05-04".to_string(),
            font_rule_id: "06-04".to_string(),
            expected_fonts: fangsong_fonts(),
            expected_bold: Some(false),
        },
        HeadingLevelConfig {
            name: "四级标题".to_string(), // (1)
            pattern: r"^[（(](\d+)[)）]".to_string(),
            numerals: NumeralSystem::Arabic,
            sequence_rule_id: "05-05".to_string(),
            font_rule_id: "06-02".to_string(),
            expected_fonts: fangsong_fonts(),
            expected_bold: Some(false),
        },
    ]
}

fn default_inherently_bold_fonts() -> Vec<String> {
    vec!["SimHei".to_string(), "黑体".to_string()]
}

impl AuditConfig {
    /// Load config from file path
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AuditConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("Failed to load config from {}: {e}; using defaults", p.display());
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Whether `name` appears enabled in the pipeline
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.pipeline
            .rules
            .iter()
            .any(|rule| rule.enabled && rule.name == name)
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            heading_levels: default_heading_levels(),
            inherently_bold_fonts: default_inherently_bold_fonts(),
            body: BodyTextConfig::default(),
            typography: TypographyConfig::default(),
            style: StyleConfig::default(),
            pipeline: PipelineConfig::default(),
            task_expiry_seconds: default_task_expiry_seconds(),
        }
    }
}
