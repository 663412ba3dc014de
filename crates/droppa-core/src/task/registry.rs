//! Per-session registry of upload tasks.

use std::sync::Arc;

use super::{FileHandle, TaskStatus, UploadTask};
use crate::sink::StatusSink;

/// Count of tasks per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub idle: usize,
    pub in_progress: usize,
    pub success: usize,
    pub failure: usize,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.idle + self.in_progress + self.success + self.failure
    }
}

/// All tasks selected during one session, in selection order.
///
/// File names key the progress subscriptions, so a name is registered once;
/// selecting the same name again returns the existing task.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Arc<UploadTask>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: FileHandle, sink: Arc<dyn StatusSink>) -> Arc<UploadTask> {
        if let Some(existing) = self.get(file.name()) {
            tracing::debug!(file = %file.name(), "file already selected, keeping existing task");
            return existing;
        }
        let task = Arc::new(UploadTask::new(file, sink));
        self.tasks.push(Arc::clone(&task));
        task
    }

    pub fn get(&self, name: &str) -> Option<Arc<UploadTask>> {
        self.tasks.iter().find(|t| t.name() == name).cloned()
    }

    pub fn tasks(&self) -> &[Arc<UploadTask>] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for task in &self.tasks {
            match task.status() {
                TaskStatus::Idle => summary.idle += 1,
                TaskStatus::InProgress => summary.in_progress += 1,
                TaskStatus::Success => summary.success += 1,
                TaskStatus::Failure => summary.failure += 1,
            }
        }
        summary
    }
}
