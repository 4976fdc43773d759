//! Reducer trait: pure state transitions over shared, immutable partitions.

use std::sync::Arc;

/// A pure transition function over one state partition.
///
/// - **Pure**: no IO, no clocks, no randomness. The same state and action always
///   produce the same next state.
/// - **Total**: every action is accepted. Validation belongs to the caller.
/// - **Structural sharing**: when an action does not change the partition, the
///   reducer returns the *same* `Arc` it was given, so observers can skip work
///   with `Arc::ptr_eq`.
pub trait Reducer {
    type State: Clone + PartialEq + core::fmt::Debug;
    type Action: Clone + core::fmt::Debug;

    /// Compute the next state for `action`.
    fn reduce(state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;
}

/// Replace `state` with `next` only if the two differ by value.
///
/// Helper for reducers that build a candidate state and want to preserve
/// identity on no-ops.
pub fn keep_if_unchanged<S: PartialEq>(state: &Arc<S>, next: S) -> Arc<S> {
    if **state == next {
        Arc::clone(state)
    } else {
        Arc::new(next)
    }
}
