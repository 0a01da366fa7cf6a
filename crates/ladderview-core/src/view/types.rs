use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::snapshot::PlayerSnapshot;

/// Closed set of display statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Loading,
    NotFound,
    Error,
    Ready,
}

impl ViewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewStatus::Loading => "loading",
            ViewStatus::NotFound => "not_found",
            ViewStatus::Error => "error",
            ViewStatus::Ready => "ready",
        }
    }
}

impl fmt::Display for ViewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the panel currently shows. `Ready` carries the last-known-good snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    NotFound,
    Error,
    Ready(Arc<PlayerSnapshot>),
}

impl ViewState {
    pub fn status(&self) -> ViewStatus {
        match self {
            ViewState::Loading => ViewStatus::Loading,
            ViewState::NotFound => ViewStatus::NotFound,
            ViewState::Error => ViewStatus::Error,
            ViewState::Ready(_) => ViewStatus::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn snapshot(&self) -> Option<&PlayerSnapshot> {
        match self {
            ViewState::Ready(snapshot) => Some(snapshot.as_ref()),
            _ => None,
        }
    }
}
