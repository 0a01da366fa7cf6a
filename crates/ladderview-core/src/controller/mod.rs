//! Freshness controller.
//!
//! Keeps a viewer's [`ViewState`](crate::view::ViewState) current: hydrates
//! from the persistent cache, refreshes from the gateway on a timer, falls
//! back to the cache on transient failures and never regresses a ready
//! display. Responses are applied in request order; anything older than the
//! newest applied response, or arriving after teardown, is discarded.

pub mod freshness;
pub mod polling;
pub mod reducer;
pub mod session;

pub use freshness::{ControllerOptions, FreshnessController, RefreshReport};
pub use polling::PollingHandle;
pub use reducer::{Transition, reduce};
pub use session::ViewerSession;
