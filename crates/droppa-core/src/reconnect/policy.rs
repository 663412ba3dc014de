use std::time::Duration;

/// Why a feed connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Server evicted this stream in favour of a newer one (`CONNECTION_REPLACED`).
    Replaced,
    /// Connect failure, read error, or non-2xx answer.
    Transport,
    /// Server ended the stream cleanly.
    Ended,
}

/// Decision returned by the reconnection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Do not reconnect this feed.
    Stop,
    /// Open a new connection after the given delay.
    ReconnectAfter(Duration),
}

/// Fixed-delay reconnection with an optional attempt cap.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Delay before every new attempt.
    pub delay: Duration,
    /// Consecutive failed attempts after which the watcher gives up (None = never).
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(2500),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// `failures` counts consecutive closes without a delivered message, including this one;
    /// it is 0 when the closing connection delivered something.
    pub fn decide(&self, failures: u32, reason: CloseReason) -> ReconnectDecision {
        if reason == CloseReason::Replaced {
            return ReconnectDecision::Stop;
        }
        if let Some(max) = self.max_attempts {
            if failures >= max {
                return ReconnectDecision::Stop;
            }
        }
        ReconnectDecision::ReconnectAfter(self.delay)
    }
}
