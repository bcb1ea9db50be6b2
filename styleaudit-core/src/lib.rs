// styleaudit Core Library
//
// Audits word-processor HTML exports against house-style rules: heading
// numbering, heading typography and body indentation.

pub mod cache;
pub mod config;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod report;
pub mod rule_table;
pub mod rules;
pub mod storage;
pub mod tasks;
pub mod types;

// Re-export main types and functions for easy use
pub use config::AuditConfig;
pub use error::{AuditError, Result};
pub use preprocessors::{DocumentSource, HtmlPreprocessor, Preprocessor};
pub use processor::{DocumentValidator, ValidationOptions, ValidationOutcome};
pub use report::{ReviewReport, ReviewResult};
pub use rule_table::{Rule, RuleTable};
pub use storage::{FileStorage, NoOpStorage, ReviewStorage};
pub use tasks::{InMemoryTaskStore, TaskRecord, TaskStatus, TaskStore};
pub use types::*;
