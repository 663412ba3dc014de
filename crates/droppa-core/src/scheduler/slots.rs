//! Slot assignment for a batch.

use std::collections::VecDeque;

/// Spread `task_count` tasks (by index) over at most `slots` chains.
///
/// Slots sit in a ring: each task pops the least recently scheduled slot,
/// is appended to its chain, and the slot goes back to the end. Empty chains
/// are dropped.
pub(crate) fn assign(task_count: usize, slots: usize) -> Vec<Vec<usize>> {
    let mut ring: VecDeque<Vec<usize>> = (0..slots.max(1)).map(|_| Vec::new()).collect();
    for index in 0..task_count {
        if let Some(mut chain) = ring.pop_front() {
            chain.push(index);
            ring.push_back(chain);
        }
    }
    ring.into_iter().filter(|chain| !chain.is_empty()).collect()
}
