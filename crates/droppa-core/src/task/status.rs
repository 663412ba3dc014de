//! Task status and its forward-only transitions.

use std::fmt;

/// Lifecycle of one upload task.
///
/// A `Failure` set by the progress stream is provisional until the upload's
/// HTTP verdict arrives, which may replace it with `Success`. A failed task
/// may also be resubmitted, which moves it back to `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Idle,
    InProgress,
    Success,
    Failure,
}

impl TaskStatus {
    /// Success or failure.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }

    /// Whether a submission of a task in this status should run it.
    /// In-progress and successful tasks are never run twice.
    pub fn accepts_submission(self) -> bool {
        matches!(self, TaskStatus::Idle | TaskStatus::Failure)
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Idle => "idle",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Success => "success",
            TaskStatus::Failure => "failure",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
