use crate::cache::{ReviewCacheKey, ReviewCacheValue};
use crate::error::{AuditError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage abstraction for caching review results
pub trait ReviewStorage: Send + Sync {
    fn get_review(&self, cache_key: &ReviewCacheKey) -> Result<Option<ReviewCacheValue>>;
    fn store_review(&self, cache_key: &ReviewCacheKey, cache_value: &ReviewCacheValue) -> Result<()>;
}

/// File-based storage implementation using local cache directory
pub struct FileStorage {
    cache_dir: PathBuf,
}

impl FileStorage {
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        // Ensure cache directory exists
        fs::create_dir_all(cache_dir.join("reviews"))?;

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn review_path(&self, cache_key: &ReviewCacheKey) -> PathBuf {
        self.cache_dir
            .join("reviews")
            .join(format!("{}.json", cache_key.to_cache_hash()))
    }
}

impl ReviewStorage for FileStorage {
    fn get_review(&self, cache_key: &ReviewCacheKey) -> Result<Option<ReviewCacheValue>> {
        let path = self.review_path(cache_key);
        if path.exists() {
            let json_str = fs::read_to_string(path)?;
            let cache_value: ReviewCacheValue = serde_json::from_str(&json_str).map_err(|e| {
                AuditError::Storage(format!("Failed to deserialize cached review: {e}"))
            })?;
            Ok(Some(cache_value))
        } else {
            Ok(None)
        }
    }

    fn store_review(&self, cache_key: &ReviewCacheKey, cache_value: &ReviewCacheValue) -> Result<()> {
        let path = self.review_path(cache_key);
        let json_str = serde_json::to_string_pretty(cache_value)
            .map_err(|e| AuditError::Storage(format!("Failed to serialize review: {e}")))?;
        fs::write(path, json_str)?;
        Ok(())
    }
}

/// SHA-256 of raw document bytes
pub fn calculate_source_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Calculate hash for configuration data (for the cache key)
pub fn calculate_config_hash<T: serde::Serialize>(config: &T) -> Result<String> {
    let config_json = serde_json::to_string(config)?;

    let mut hasher = Sha256::new();
    hasher.update(config_json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate hash for text content (rule tables)
pub fn calculate_text_hash(text: &str) -> String {
    calculate_source_hash(text.as_bytes())
}

/// No-op storage implementation that disables all caching
pub struct NoOpStorage;

impl Default for NoOpStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ReviewStorage for NoOpStorage {
    fn get_review(&self, _cache_key: &ReviewCacheKey) -> Result<Option<ReviewCacheValue>> {
        Ok(None) // Always cache miss
    }

    fn store_review(&self, _cache_key: &ReviewCacheKey, _cache_value: &ReviewCacheValue) -> Result<()> {
        Ok(()) // No-op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;
    use crate::report::ReviewResult;
    use crate::types::{Issue, Suggestion};

    fn key() -> ReviewCacheKey {
        ReviewCacheKey::new(
            calculate_source_hash(b"<body></body>"),
            calculate_text_hash("| id |"),
            calculate_config_hash(&AuditConfig::default()).unwrap(),
        )
    }

    #[test]
    fn test_source_hash_consistency() {
        let data = b"<html><body>test</body></html>";
        assert_eq!(calculate_source_hash(data), calculate_source_hash(data));
        assert_ne!(calculate_source_hash(b"doc 1"), calculate_source_hash(b"doc 2"));
    }

    #[test]
    fn test_config_hash_tracks_changes() {
        let mut config = AuditConfig::default();
        let before = calculate_config_hash(&config).unwrap();
        config.body.check_left_indent = true;
        assert_ne!(before, calculate_config_hash(&config).unwrap());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        assert!(temp_dir.path().join("reviews").is_dir());

        assert!(storage.get_review(&key()).unwrap().is_none());

        let result = ReviewResult::new(vec![Issue {
            issue_type: "标序问题-跳序问题".to_string(),
            specific_word: "四、".to_string(),
            sentence: "四、C".to_string(),
            suggestion: Suggestion::remind("提醒"),
            rule_id: "05-02".to_string(),
            additional_notes: String::new(),
        }]);
        storage
            .store_review(&key(), &ReviewCacheValue::new(result.clone(), 3))
            .unwrap();

        let cached = storage.get_review(&key()).unwrap().unwrap();
        assert_eq!(cached.result, result);
        assert_eq!(cached.processing_time_ms, 3);
    }

    #[test]
    fn test_corrupt_entry_is_a_storage_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        let path = temp_dir
            .path()
            .join("reviews")
            .join(format!("{}.json", key().to_cache_hash()));
        fs::write(path, "not json").unwrap();

        assert!(matches!(storage.get_review(&key()), Err(AuditError::Storage(_))));
    }

    #[test]
    fn test_noop_storage_always_misses() {
        let storage = NoOpStorage::new();
        storage
            .store_review(&key(), &ReviewCacheValue::new(ReviewResult::default(), 0))
            .unwrap();
        assert!(storage.get_review(&key()).unwrap().is_none());
    }
}
