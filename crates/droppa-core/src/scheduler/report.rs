//! Per-batch results.

use crate::task::TaskStatus;

/// How one submission of a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Not run: the task was already in this status.
    Skipped(TaskStatus),
    Succeeded,
    /// Failed with the diagnostic text shown for the task.
    Failed(String),
}

/// Outcomes of one batch, in submission order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    outcomes: Vec<(String, TaskOutcome)>,
}

impl BatchReport {
    pub(crate) fn new(outcomes: Vec<(String, TaskOutcome)>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[(String, TaskOutcome)] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Skipped(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}
