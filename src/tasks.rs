//! In-memory generation status per repository id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SummarizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Idle,
    Generating,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub progress: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl TaskStatus {
    fn idle() -> Self {
        Self {
            state: TaskState::Idle,
            progress: "No generation requested".to_string(),
            started_at: None,
            completed_at: None,
            error_message: None,
        }
    }
}

/// Shared handle; clones see the same map.
#[derive(Debug, Clone, Default)]
pub struct TaskTracker {
    inner: Arc<Mutex<HashMap<i64, TaskStatus>>>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<i64, TaskStatus>> {
        // a panic while holding the lock leaves the map itself consistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move `id` to `generating`. Rejected if a generation for `id` is already running.
    pub fn begin(&self, id: i64, progress: impl Into<String>) -> Result<(), SummarizeError> {
        let mut map = self.map();
        if matches!(map.get(&id), Some(s) if s.state == TaskState::Generating) {
            return Err(SummarizeError::Conflict { id });
        }
        map.insert(
            id,
            TaskStatus {
                state: TaskState::Generating,
                progress: progress.into(),
                started_at: Some(Utc::now()),
                completed_at: None,
                error_message: None,
            },
        );
        Ok(())
    }

    /// Update the progress message of a running generation.
    pub fn progress(&self, id: i64, progress: impl Into<String>) {
        if let Some(status) = self.map().get_mut(&id) {
            if status.state == TaskState::Generating {
                status.progress = progress.into();
            }
        }
    }

    pub fn complete(&self, id: i64, progress: impl Into<String>) {
        self.finish(id, TaskState::Completed, progress.into(), None);
    }

    pub fn fail(&self, id: i64, error: impl Into<String>) {
        self.finish(id, TaskState::Failed, "Generation failed".to_string(), Some(error.into()));
    }

    fn finish(&self, id: i64, state: TaskState, progress: String, error: Option<String>) {
        let mut map = self.map();
        let status = map.entry(id).or_insert_with(TaskStatus::idle);
        status.state = state;
        status.progress = progress;
        status.completed_at = Some(Utc::now());
        status.error_message = error;
    }

    /// Current status; ids never seen are `idle`.
    pub fn status(&self, id: i64) -> TaskStatus {
        self.map().get(&id).cloned().unwrap_or_else(TaskStatus::idle)
    }

    /// All tracked statuses, ordered by id.
    pub fn snapshot(&self) -> Vec<(i64, TaskStatus)> {
        let mut all: Vec<(i64, TaskStatus)> =
            self.map().iter().map(|(id, s)| (*id, s.clone())).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }
}
