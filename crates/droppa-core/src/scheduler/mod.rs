//! Upload scheduler.
//!
//! A batch is spread over N slots: each task, in arrival order, is appended
//! to the slot that was scheduled least recently, and each slot runs its
//! tasks one after another. At most N uploads are in flight, a slow upload
//! only delays its own slot, and the batch resolves once every slot settles.

mod execute;
mod pump;
mod report;
mod slots;

pub use report::{BatchReport, TaskOutcome};

use futures_util::future::join_all;
use std::sync::Arc;

use crate::task::{TaskRegistry, UploadTask};
use crate::transport::Transport;

/// Default number of upload slots.
pub const DEFAULT_SLOTS: usize = 4;

pub struct UploadScheduler<T: Transport> {
    transport: Arc<T>,
    slots: usize,
}

impl<T: Transport> UploadScheduler<T> {
    pub fn new(transport: Arc<T>, slots: usize) -> Self {
        Self {
            transport,
            slots: slots.max(1),
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Drive every task to success or failure (or skip it if it is already
    /// running or done). Task errors never escape; they are in the report.
    /// A task listed more than once runs once and is reported once.
    pub async fn run_batch(&self, tasks: &[Arc<UploadTask>]) -> BatchReport {
        let mut unique: Vec<Arc<UploadTask>> = Vec::with_capacity(tasks.len());
        for task in tasks {
            if !unique.iter().any(|seen| Arc::ptr_eq(seen, task)) {
                unique.push(Arc::clone(task));
            }
        }
        let tasks = unique.as_slice();

        let chains = slots::assign(tasks.len(), self.slots);
        tracing::info!(tasks = tasks.len(), slots = chains.len(), "starting upload batch");

        let runs = chains.into_iter().map(|chain| {
            let transport = Arc::clone(&self.transport);
            async move {
                let mut settled = Vec::with_capacity(chain.len());
                for index in chain {
                    let outcome = execute::run_task(&transport, &tasks[index]).await;
                    settled.push((index, outcome));
                }
                settled
            }
        });

        let mut outcomes: Vec<Option<TaskOutcome>> = vec![None; tasks.len()];
        for (index, outcome) in join_all(runs).await.into_iter().flatten() {
            outcomes[index] = Some(outcome);
        }

        let report = BatchReport::new(
            tasks
                .iter()
                .zip(outcomes)
                .map(|(task, outcome)| {
                    (
                        task.name().to_string(),
                        outcome.unwrap_or(TaskOutcome::Skipped(task.status())),
                    )
                })
                .collect(),
        );
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "upload batch settled"
        );
        report
    }

    /// Submit every task in the registry, in selection order.
    pub async fn run_registry(&self, registry: &TaskRegistry) -> BatchReport {
        self.run_batch(registry.tasks()).await
    }
}
