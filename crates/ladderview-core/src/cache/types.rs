use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::PlayerSnapshot;
use crate::view::{ViewState, ViewStatus};

/// Serialized form of the last ready view for a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub is_loaded: bool,
    pub status: ViewStatus,
    pub snapshot: PlayerSnapshot,
    pub saved_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Entry for a snapshot that is currently displayed.
    pub fn ready(snapshot: &PlayerSnapshot) -> Self {
        Self {
            is_loaded: true,
            status: ViewStatus::Ready,
            snapshot: snapshot.clone(),
            saved_at: Utc::now(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.is_loaded && self.status == ViewStatus::Ready
    }

    /// Rebuild the view state the entry was saved from.
    ///
    /// Flags other than loaded/ready map to their status; a loaded flag
    /// without a ready status is treated as still loading.
    pub fn into_view_state(self) -> ViewState {
        match (self.is_loaded, self.status) {
            (true, ViewStatus::Ready) => ViewState::Ready(Arc::new(self.snapshot)),
            (_, ViewStatus::NotFound) => ViewState::NotFound,
            (_, ViewStatus::Error) => ViewState::Error,
            _ => ViewState::Loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_snapshot;

    #[test]
    fn test_ready_entry_restores_ready_state() {
        let snapshot = sample_snapshot("Maru", "KR");
        let entry = CacheEntry::ready(&snapshot);
        assert!(entry.is_ready());

        match entry.into_view_state() {
            ViewState::Ready(restored) => assert_eq!(*restored, snapshot),
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[test]
    fn test_stored_flags_map_to_status() {
        let mut entry = CacheEntry::ready(&sample_snapshot("Maru", "KR"));
        entry.is_loaded = false;
        entry.status = ViewStatus::Error;
        assert_eq!(entry.clone().into_view_state(), ViewState::Error);

        entry.status = ViewStatus::Ready;
        assert_eq!(entry.into_view_state(), ViewState::Loading);
    }

    #[test]
    fn test_entry_json_field_names() {
        let entry = CacheEntry::ready(&sample_snapshot("Maru", "KR"));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["isLoaded"], true);
        assert_eq!(value["status"], "ready");
        assert_eq!(value["snapshot"]["player"]["name"], "Maru");
        assert!(value["savedAt"].is_string());
    }
}
