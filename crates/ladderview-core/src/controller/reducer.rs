//! Outcome transition table.
//!
//! | Outcome            | Current is `Ready`      | Current is not `Ready`        |
//! |--------------------|-------------------------|-------------------------------|
//! | `Success(s)`       | `Ready(s)`, cache write | `Ready(s)`, cache write       |
//! | `NotFound`         | keep                    | `NotFound`                    |
//! | `TransientFailure` | keep                    | rehydrate from cache or `Loading` |
//! | `ProtocolError`    | keep                    | `Error`                       |
//!
//! A ready display is only ever replaced by newer data.

use std::sync::Arc;

use crate::gateway::FetchOutcome;
use crate::snapshot::PlayerSnapshot;
use crate::view::ViewState;

/// Effect to apply for one fetch outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Leave the current state untouched.
    Keep,
    /// Show fresh data and write it through to the cache.
    Store(Arc<PlayerSnapshot>),
    /// Replace the state.
    Show(ViewState),
    /// Adopt the cached entry for the channel, or `Loading` on a miss.
    Rehydrate,
}

/// Decide the transition for `outcome` given the `current` state.
pub fn reduce(current: &ViewState, outcome: &FetchOutcome) -> Transition {
    match (current.is_ready(), outcome) {
        (_, FetchOutcome::Success(snapshot)) => Transition::Store(Arc::clone(snapshot)),
        (true, _) => Transition::Keep,
        (false, FetchOutcome::NotFound) => Transition::Show(ViewState::NotFound),
        (false, FetchOutcome::TransientFailure) => Transition::Rehydrate,
        (false, FetchOutcome::ProtocolError) => Transition::Show(ViewState::Error),
    }
}
