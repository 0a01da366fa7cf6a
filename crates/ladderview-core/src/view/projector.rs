//! Pure projection from controller state to what a renderer draws.

use serde::Serialize;

use super::types::{ViewState, ViewStatus};
use crate::snapshot::PlayerSnapshot;

/// Renderable view derived from a [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "snapshot", rename_all = "snake_case")]
pub enum ProjectedView<'a> {
    Loading,
    NotFound,
    Error,
    Ready(&'a PlayerSnapshot),
}

/// Message shown in place of the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelMessage {
    pub emote: Option<&'static str>,
    pub text: &'static str,
}

const LOADING_MESSAGE: PanelMessage = PanelMessage {
    emote: None,
    text: "Loading player data...",
};

const NOT_FOUND_MESSAGE: PanelMessage = PanelMessage {
    emote: Some("¯\\_(ツ)_/¯"),
    text: "StarCraft II profile not found. Make sure the extension is configured properly in your Twitch dashboard.",
};

const ERROR_MESSAGE: PanelMessage = PanelMessage {
    emote: Some("(╯°□°）╯︵ ┻━┻"),
    text: "Ooops! We couldn't fetch your StarCraft II stats. Please check again later.",
};

/// Project controller state for rendering. No side effects.
pub fn project(state: &ViewState) -> ProjectedView<'_> {
    match state {
        ViewState::Loading => ProjectedView::Loading,
        ViewState::NotFound => ProjectedView::NotFound,
        ViewState::Error => ProjectedView::Error,
        ViewState::Ready(snapshot) => ProjectedView::Ready(snapshot.as_ref()),
    }
}

impl<'a> ProjectedView<'a> {
    pub fn status(&self) -> ViewStatus {
        match self {
            ProjectedView::Loading => ViewStatus::Loading,
            ProjectedView::NotFound => ViewStatus::NotFound,
            ProjectedView::Error => ViewStatus::Error,
            ProjectedView::Ready(_) => ViewStatus::Ready,
        }
    }

    pub fn snapshot(&self) -> Option<&'a PlayerSnapshot> {
        match *self {
            ProjectedView::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Message to display instead of stats; `None` when ready.
    pub fn message(&self) -> Option<PanelMessage> {
        match self {
            ProjectedView::Loading => Some(LOADING_MESSAGE),
            ProjectedView::NotFound => Some(NOT_FOUND_MESSAGE),
            ProjectedView::Error => Some(ERROR_MESSAGE),
            ProjectedView::Ready(_) => None,
        }
    }
}
