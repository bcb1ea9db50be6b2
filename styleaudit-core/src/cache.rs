use crate::report::ReviewResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version constants for cache invalidation
pub mod versions {
    pub const STYLEAUDIT_VERSION: &str = env!("CARGO_PKG_VERSION");
    /// Bump when checks change what they report for the same input
    pub const PROCESSING_VERSION: &str = "1.0.0";
}

/// Cache key (document + rule table + config → review)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReviewCacheKey {
    pub source_hash: String,
    pub rules_hash: String,
    pub config_hash: String,
    pub styleaudit_version: String,
    pub processing_version: String,
}

impl ReviewCacheKey {
    pub fn new(source_hash: String, rules_hash: String, config_hash: String) -> Self {
        Self {
            source_hash,
            rules_hash,
            config_hash,
            styleaudit_version: versions::STYLEAUDIT_VERSION.to_string(),
            processing_version: versions::PROCESSING_VERSION.to_string(),
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(&self.source_hash);
        hasher.update(&self.rules_hash);
        hasher.update(&self.config_hash);
        hasher.update(&self.styleaudit_version);
        hasher.update(&self.processing_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Cached review with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCacheValue {
    pub result: ReviewResult,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub cache_version: String,
}

impl ReviewCacheValue {
    pub fn new(result: ReviewResult, processing_time_ms: u64) -> Self {
        Self {
            result,
            created_at: Utc::now(),
            processing_time_ms,
            cache_version: versions::STYLEAUDIT_VERSION.to_string(),
        }
    }
}
