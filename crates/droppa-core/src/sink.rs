//! Display handles for tasks.
//!
//! The scheduler never touches a UI; each task carries a [`StatusSink`] that
//! the presentation layer supplies, such as a terminal row or a test recorder.

use std::sync::{Mutex, PoisonError};

use crate::task::TaskStatus;

/// Update sink for one task's visible state.
///
/// Called while the task's state lock is held, so implementations must not
/// call back into the task.
pub trait StatusSink: Send + Sync {
    fn set_percent(&self, percent: u8);
    fn set_status(&self, status: TaskStatus);
    /// Diagnostic text for a failure (rejected upload body, transport error).
    fn set_detail(&self, _detail: &str) {}
}

/// Sink that drops every update.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NullSink;

#[cfg(test)]
impl StatusSink for NullSink {
    fn set_percent(&self, _percent: u8) {}
    fn set_status(&self, _status: TaskStatus) {}
}

/// One recorded sink call (see [`MemorySink`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Percent(u8),
    Status(TaskStatus),
    Detail(String),
}

/// Sink that keeps every update in memory, in call order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SinkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Statuses only, in order.
    pub fn statuses(&self) -> Vec<TaskStatus> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Percentages only, in order.
    pub fn percents(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Percent(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl StatusSink for MemorySink {
    fn set_percent(&self, percent: u8) {
        self.push(SinkEvent::Percent(percent));
    }

    fn set_status(&self, status: TaskStatus) {
        self.push(SinkEvent::Status(status));
    }

    fn set_detail(&self, detail: &str) {
        self.push(SinkEvent::Detail(detail.to_string()));
    }
}
