//! Gateway backed by JSON files on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use ladderview_core::{FetchOutcome, GatewayError, GatewayResponse, PlayerGateway};

use crate::commands::helpers::is_valid_channel_id;

/// Answers every call from `<dir>/<channel_id>.json`, re-read each time so
/// the file can be edited while the viewer is mounted.
///
/// The file holds a [`GatewayResponse`]: `{"status": 200, "body": {...}}`.
/// A missing or unreadable file behaves like a transport failure.
#[derive(Debug, Clone)]
pub struct FixtureGateway {
    dir: PathBuf,
}

impl FixtureGateway {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PlayerGateway for FixtureGateway {
    async fn fetch_player_data(
        &self,
        channel_id: &str,
        _token: &str,
    ) -> Result<FetchOutcome, GatewayError> {
        if !is_valid_channel_id(channel_id) {
            return Err(GatewayError::InvalidChannel {
                channel_id: channel_id.to_string(),
            });
        }

        let path = self.dir.join(format!("{}.json", channel_id));
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    event = "cli.fixture.missing",
                    path = %path.display()
                );
                return Ok(FetchOutcome::TransientFailure);
            }
            Err(e) => {
                warn!(
                    event = "cli.fixture.read_failed",
                    path = %path.display(),
                    error = %e
                );
                return Ok(FetchOutcome::TransientFailure);
            }
        };

        let response: GatewayResponse =
            serde_json::from_str(&content).map_err(|e| GatewayError::Decode {
                message: format!("{}: {}", path.display(), e),
            })?;

        let outcome = response.classify();
        debug!(
            event = "cli.fixture.read_completed",
            channel_id = channel_id,
            status = response.status,
            outcome = outcome.kind()
        );
        Ok(outcome)
    }
}
