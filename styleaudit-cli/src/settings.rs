//! Run-wide settings resolved before any document is touched

use chrono::Duration;
use std::path::{Path, PathBuf};
use styleaudit_core::AuditConfig;

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    Default,
    File(PathBuf),
    /// The file could not be loaded; defaults are in use
    Fallback { path: PathBuf, error: String },
}

/// Load the config file when one is given, falling back to defaults on failure
pub fn load_config(path: Option<&Path>) -> (AuditConfig, ConfigOrigin) {
    let Some(path) = path else {
        return (AuditConfig::default(), ConfigOrigin::Default);
    };

    match AuditConfig::load_from_file(path) {
        Ok(config) => (config, ConfigOrigin::File(path.to_path_buf())),
        Err(e) => {
            log::warn!("Failed to load config from {}: {}", path.display(), e);
            (
                AuditConfig::default(),
                ConfigOrigin::Fallback {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                },
            )
        }
    }
}

/// Task lifetime for the batch sweep; out-of-range values use the default
pub fn task_ttl(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or_else(|| {
            let fallback = AuditConfig::default().task_expiry_seconds;
            log::warn!(
                "task_expiry_seconds {} is out of range, using {}",
                seconds,
                fallback
            );
            Duration::seconds(fallback as i64)
        })
}
