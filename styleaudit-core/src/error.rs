//! Error types for styleaudit-core.
//!
//! Markup and rule-table content never produce errors; only the I/O and
//! configuration boundary does.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    /// Reading a document, rule table or config file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A heading level's numbering pattern does not compile
    #[error("Invalid numbering pattern for heading level {level}: {source}")]
    InvalidPattern {
        level: usize,
        #[source]
        source: regex::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}
