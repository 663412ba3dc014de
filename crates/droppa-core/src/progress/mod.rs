//! Progress: per-file push events, the subscription state machine, and
//! transfer statistics for streamed downloads.

mod event;
mod machine;
mod stats;

pub use event::ProgressEvent;
pub use machine::{transition, Effect, Signal, SubscriptionState, Transition};
pub use stats::TransferProgress;
