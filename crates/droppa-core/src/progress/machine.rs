//! Progress subscription state machine.
//!
//! `connecting → open → {receiving*, closed}`. All inbound signals are folded
//! through [`transition`]; the caller applies the returned [`Effect`] to the task.

/// Where a subscription is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Connecting,
    Open,
    /// No further signals are processed. `completed` is true when closed by a 100% message.
    Closed { completed: bool },
}

impl SubscriptionState {
    pub fn is_closed(self) -> bool {
        matches!(self, SubscriptionState::Closed { .. })
    }
}

/// Inbound signal from the subscription transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Opened,
    Data(u8),
    /// Transport error or end of stream.
    Error,
}

/// What the caller must do with the task after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Refresh the percentage and mark in-progress.
    Report(u8),
    /// Report 100% and tear the subscription down.
    Complete,
    /// Mark the task failed and tear the subscription down.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: SubscriptionState,
    pub effect: Effect,
}

impl Transition {
    fn to(state: SubscriptionState, effect: Effect) -> Self {
        Self { state, effect }
    }
}

pub fn transition(state: SubscriptionState, signal: Signal) -> Transition {
    use SubscriptionState::*;
    match (state, signal) {
        (Closed { .. }, _) => Transition::to(state, Effect::None),
        (Connecting, Signal::Opened) | (Open, Signal::Opened) => Transition::to(Open, Effect::None),
        (Connecting, Signal::Data(p)) | (Open, Signal::Data(p)) => {
            if p >= 100 {
                Transition::to(Closed { completed: true }, Effect::Complete)
            } else {
                Transition::to(Open, Effect::Report(p))
            }
        }
        (Connecting, Signal::Error) | (Open, Signal::Error) => {
            Transition::to(Closed { completed: false }, Effect::Fail)
        }
    }
}
