//! Upload tasks: one selected file and its visible status.

mod registry;
mod status;

pub use registry::{StatusSummary, TaskRegistry};
pub use status::TaskStatus;

use bytes::Bytes;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::sink::StatusSink;

/// A selected file: name, declared size and content.
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    content: Bytes,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk; the handle is named after the path's last component.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("no file name in {}", path.display()),
                )
            })?;
        let content = tokio::fs::read(path).await?;
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte length sent as the multipart `size` field.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

/// Point-in-time copy of a task's visible state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub percent: u8,
    pub detail: Option<String>,
}

#[derive(Debug)]
struct TaskState {
    status: TaskStatus,
    percent: u8,
    detail: Option<String>,
}

/// One file pending, in flight, or finished.
///
/// Mutated only by its own execution path in the scheduler and by its own
/// progress pump. Every change is mirrored to the task's [`StatusSink`].
pub struct UploadTask {
    file: FileHandle,
    state: Mutex<TaskState>,
    sink: Arc<dyn StatusSink>,
}

impl std::fmt::Debug for UploadTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadTask")
            .field("name", &self.file.name)
            .field("size", &self.file.size())
            .field("state", &*self.lock())
            .finish()
    }
}

impl UploadTask {
    pub fn new(file: FileHandle, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            file,
            state: Mutex::new(TaskState {
                status: TaskStatus::Idle,
                percent: 0,
                detail: None,
            }),
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TaskState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn file(&self) -> &FileHandle {
        &self.file
    }

    pub fn status(&self) -> TaskStatus {
        self.lock().status
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        let state = self.lock();
        TaskSnapshot {
            status: state.status,
            percent: state.percent,
            detail: state.detail.clone(),
        }
    }

    /// Claim the task for a run. Returns false (and changes nothing) when the
    /// task is already in progress or succeeded.
    pub(crate) fn try_begin(&self) -> bool {
        let mut state = self.lock();
        if !state.status.accepts_submission() {
            return false;
        }
        state.status = TaskStatus::InProgress;
        state.percent = 0;
        state.detail = None;
        self.sink.set_status(TaskStatus::InProgress);
        self.sink.set_percent(0);
        true
    }

    /// Apply a server-pushed percentage. Ignored once the task is terminal.
    pub(crate) fn report_progress(&self, percent: u8) -> bool {
        let mut state = self.lock();
        if state.status.is_terminal() {
            return false;
        }
        if state.status != TaskStatus::InProgress {
            state.status = TaskStatus::InProgress;
            self.sink.set_status(TaskStatus::InProgress);
        }
        state.percent = percent.min(100);
        self.sink.set_percent(state.percent);
        true
    }

    /// Failure seen on the progress path (open error, stream error).
    /// Ignored once the task is terminal.
    pub(crate) fn fail_from_progress(&self, detail: &str) -> bool {
        let mut state = self.lock();
        if state.status.is_terminal() {
            return false;
        }
        Self::set_failure(&mut state, &*self.sink, detail);
        true
    }

    /// Record the upload's HTTP verdict. Authoritative: it is applied even if
    /// the progress path already reported a failure.
    pub(crate) fn settle(&self, verdict: Result<(), String>) {
        let mut state = self.lock();
        match verdict {
            Ok(()) => {
                state.status = TaskStatus::Success;
                state.detail = None;
                self.sink.set_status(TaskStatus::Success);
            }
            Err(detail) => Self::set_failure(&mut state, &*self.sink, &detail),
        }
    }

    fn set_failure(state: &mut TaskState, sink: &dyn StatusSink, detail: &str) {
        state.status = TaskStatus::Failure;
        state.detail = Some(detail.to_string());
        sink.set_status(TaskStatus::Failure);
        sink.set_detail(detail);
    }
}
