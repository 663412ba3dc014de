//! Map a feed's terminating error to a close reason.

use super::policy::CloseReason;
use crate::transport::TransportError;

/// `None` means the stream ended without an error.
pub fn classify(error: Option<&TransportError>) -> CloseReason {
    match error {
        None | Some(TransportError::StreamClosed) => CloseReason::Ended,
        Some(_) => CloseReason::Transport,
    }
}
