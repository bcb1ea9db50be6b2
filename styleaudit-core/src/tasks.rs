//! Review task tracking
//!
//! A task follows one document through `Pending → Processing → Success|Error`.
//! The store never expires anything on its own: whoever owns it calls
//! `sweep_expired` with the current time.

use crate::report::ReviewResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
pub use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl TaskStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub status: TaskStatus,
    /// File name or other label of the source document
    pub source_name: String,
    /// Source size in bytes, when known
    pub size: Option<u64>,
    pub result: Option<ReviewResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn new(source_name: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: TaskStatus::Pending,
            source_name: source_name.into(),
            size,
            result: None,
            error: None,
            created_at: Utc::now(),
        }
    }
}

/// Injectable registry of review tasks
pub trait TaskStore: Send + Sync {
    /// Register a task; returns its id
    fn insert(&self, record: TaskRecord) -> Uuid;
    fn get(&self, id: &Uuid) -> Option<TaskRecord>;
    /// Returns false when the task is unknown
    fn update_status(&self, id: &Uuid, status: TaskStatus) -> bool;
    fn complete(&self, id: &Uuid, result: ReviewResult) -> bool;
    fn fail(&self, id: &Uuid, error: String) -> bool;
    /// Remove tasks older than `ttl` at `now`; returns how many were removed
    fn sweep_expired(&self, now: DateTime<Utc>, ttl: Duration) -> usize;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<HashMap<Uuid, TaskRecord>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, oldest first
    pub fn snapshot(&self) -> Vec<TaskRecord> {
        let mut records: Vec<TaskRecord> = self.lock().values().cloned().collect();
        records.sort_by_key(|record| record.created_at);
        records
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, TaskRecord>> {
        // a panicking writer leaves whole records behind, so the map stays usable
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn modify(&self, id: &Uuid, apply: impl FnOnce(&mut TaskRecord)) -> bool {
        match self.lock().get_mut(id) {
            Some(record) => {
                apply(record);
                true
            }
            None => false,
        }
    }
}

impl TaskStore for InMemoryTaskStore {
    fn insert(&self, record: TaskRecord) -> Uuid {
        let id = record.id;
        self.lock().insert(id, record);
        id
    }

    fn get(&self, id: &Uuid) -> Option<TaskRecord> {
        self.lock().get(id).cloned()
    }

    fn update_status(&self, id: &Uuid, status: TaskStatus) -> bool {
        self.modify(id, |record| record.status = status)
    }

    fn complete(&self, id: &Uuid, result: ReviewResult) -> bool {
        self.modify(id, |record| {
            record.status = TaskStatus::Success;
            record.result = Some(result);
            record.error = None;
        })
    }

    fn fail(&self, id: &Uuid, error: String) -> bool {
        self.modify(id, |record| {
            record.status = TaskStatus::Error;
            record.error = Some(error);
        })
    }

    fn sweep_expired(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let mut tasks = self.lock();
        let before = tasks.len();
        tasks.retain(|_, record| now - record.created_at <= ttl);
        let removed = before - tasks.len();
        if removed > 0 {
            log::info!("Swept {} expired tasks", removed);
        }
        removed
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_success() {
        let store = InMemoryTaskStore::new();
        let id = store.insert(TaskRecord::new("公文.html", Some(1024)));

        let record = store.get(&id).unwrap();
        assert_eq!(record.status, TaskStatus::Pending);
        assert_eq!(record.size, Some(1024));

        assert!(store.update_status(&id, TaskStatus::Processing));
        assert!(store.complete(&id, ReviewResult::default()));

        let record = store.get(&id).unwrap();
        assert_eq!(record.status, TaskStatus::Success);
        assert!(record.status.is_finished());
        assert_eq!(record.result, Some(ReviewResult::default()));
    }

    #[test]
    fn lifecycle_error() {
        let store = InMemoryTaskStore::new();
        let id = store.insert(TaskRecord::new("missing.html", None));
        assert!(store.fail(&id, "I/O error".to_string()));

        let record = store.get(&id).unwrap();
        assert_eq!(record.status, TaskStatus::Error);
        assert_eq!(record.error.as_deref(), Some("I/O error"));
        assert!(record.result.is_none());
    }

    #[test]
    fn unknown_task_updates_report_false() {
        let store = InMemoryTaskStore::new();
        let id = Uuid::new_v4();
        assert!(!store.update_status(&id, TaskStatus::Processing));
        assert!(!store.complete(&id, ReviewResult::default()));
        assert!(!store.fail(&id, String::new()));
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn sweep_removes_only_expired() {
        let store = InMemoryTaskStore::new();
        let mut old = TaskRecord::new("old.html", None);
        old.created_at = Utc::now() - Duration::seconds(7201);
        let old_id = store.insert(old);
        let fresh_id = store.insert(TaskRecord::new("fresh.html", None));

        let removed = store.sweep_expired(Utc::now(), Duration::seconds(7200));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&old_id).is_none());
        assert!(store.get(&fresh_id).is_some());
    }

    #[test]
    fn snapshot_is_oldest_first() {
        let store = InMemoryTaskStore::new();
        let mut first = TaskRecord::new("a.html", None);
        first.created_at = Utc::now() - Duration::seconds(10);
        store.insert(TaskRecord::new("b.html", None));
        store.insert(first);

        let names: Vec<String> = store.snapshot().into_iter().map(|r| r.source_name).collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(TaskStatus::Processing).unwrap(), "processing");
    }
}
