//! Reconnection policy for long-lived progress feeds.
//!
//! Classifies why a feed connection ended and decides whether (and when) to
//! open a new one, so every feed watcher shares the same behaviour.

mod classify;
mod policy;

pub use classify::classify;
pub use policy::{CloseReason, ReconnectDecision, ReconnectPolicy};
