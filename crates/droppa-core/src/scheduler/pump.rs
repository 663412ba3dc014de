//! Drives one open progress subscription through the state machine.

use futures_util::StreamExt;
use std::sync::Arc;

use crate::progress::{transition, Effect, Signal, SubscriptionState};
use crate::task::UploadTask;
use crate::transport::{ProgressStream, TransportError};

/// Consume `stream` until the state machine closes the subscription, then drop it.
/// Returns the closed state.
pub(crate) async fn pump_progress(mut stream: ProgressStream, task: Arc<UploadTask>) -> SubscriptionState {
    let mut state = transition(SubscriptionState::Connecting, Signal::Opened).state;
    let mut last_error = String::new();

    while !state.is_closed() {
        let signal = match stream.next().await {
            Some(Ok(event)) => Signal::Data(event.progress),
            Some(Err(TransportError::Decode(e))) => {
                tracing::warn!(file = task.name(), error = %e, "ignoring malformed progress message");
                continue;
            }
            Some(Err(e)) => {
                last_error = e.detail();
                Signal::Error
            }
            None => {
                last_error = TransportError::StreamClosed.detail();
                Signal::Error
            }
        };

        let step = transition(state, signal);
        state = step.state;
        match step.effect {
            Effect::None => {}
            Effect::Report(percent) => {
                task.report_progress(percent);
            }
            Effect::Complete => {
                task.report_progress(100);
                tracing::debug!(file = task.name(), "progress complete, closing subscription");
            }
            Effect::Fail => {
                if task.fail_from_progress(&last_error) {
                    tracing::warn!(file = task.name(), error = %last_error, "progress subscription failed");
                }
            }
        }
    }

    drop(stream);
    state
}
