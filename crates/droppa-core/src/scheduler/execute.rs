//! Per-task execution: guard, subscribe, upload, record the verdict.

use std::sync::Arc;

use super::pump::pump_progress;
use super::report::TaskOutcome;
use crate::task::UploadTask;
use crate::transport::Transport;

/// Runs one task to a terminal status. Never returns an error: every failure
/// is recorded on the task and reported as [`TaskOutcome::Failed`].
pub(super) async fn run_task<T: Transport>(transport: &Arc<T>, task: &Arc<UploadTask>) -> TaskOutcome {
    if !task.try_begin() {
        let status = task.status();
        tracing::debug!(file = task.name(), %status, "skipping resubmitted task");
        return TaskOutcome::Skipped(status);
    }

    // Subscribe first so no progress pushed during the upload is missed.
    let subscription = match transport.open_progress(task.name()).await {
        Ok(stream) => stream,
        Err(e) => {
            let detail = e.detail();
            tracing::warn!(file = task.name(), error = %e, "progress subscription failed to open");
            task.settle(Err(detail.clone()));
            return TaskOutcome::Failed(detail);
        }
    };

    let pump = tokio::spawn(pump_progress(subscription, Arc::clone(task)));

    let outcome = match transport.upload(task.file()).await {
        Ok(()) => {
            tracing::info!(file = task.name(), size = task.file().size(), "upload accepted");
            task.settle(Ok(()));
            TaskOutcome::Succeeded
        }
        Err(e) => {
            let detail = e.detail();
            tracing::warn!(file = task.name(), status = ?e.status(), error = %e, "upload failed");
            task.settle(Err(detail.clone()));
            TaskOutcome::Failed(detail)
        }
    };

    // Progress is ignored once the verdict is recorded; release the stream.
    if !pump.is_finished() {
        tracing::debug!(file = task.name(), "closing progress subscription after verdict");
        pump.abort();
    }
    outcome
}
