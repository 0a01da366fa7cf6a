use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::snapshot::{PlayerSnapshot, parse_player_payload};

/// Channel identity and access token from the authentication handshake.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub channel_id: String,
    pub token: String,
}

impl Credentials {
    pub fn new(channel_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            token: token.into(),
        }
    }
}

// Tokens must never reach the logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("channel_id", &self.channel_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Result of one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(Arc<PlayerSnapshot>),
    /// No player is configured for the channel.
    NotFound,
    /// Network or server-side failure; the next poll retries.
    TransientFailure,
    /// Unexpected status or a body that failed schema validation.
    ProtocolError,
}

impl FetchOutcome {
    pub fn success(snapshot: PlayerSnapshot) -> Self {
        FetchOutcome::Success(Arc::new(snapshot))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::NotFound => "not_found",
            FetchOutcome::TransientFailure => "transient_failure",
            FetchOutcome::ProtocolError => "protocol_error",
        }
    }
}

/// Raw response as reported by a gateway transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: u16,
    #[serde(default)]
    pub body: Value,
}

impl GatewayResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Map the response onto a [`FetchOutcome`].
    ///
    /// - `200` with a valid body: `Success`
    /// - `200` with an invalid body: `ProtocolError`
    /// - `404`: `NotFound`
    /// - `5xx`: `TransientFailure`
    /// - anything else: `ProtocolError`
    pub fn classify(&self) -> FetchOutcome {
        match self.status {
            200 => match parse_player_payload(&self.body) {
                Ok(snapshot) => FetchOutcome::success(snapshot),
                Err(e) => {
                    tracing::warn!(
                        event = "core.gateway.payload_invalid",
                        error = %e,
                        "Gateway returned 200 with a body that does not match the player schema"
                    );
                    FetchOutcome::ProtocolError
                }
            },
            404 => FetchOutcome::NotFound,
            500..=599 => FetchOutcome::TransientFailure,
            status => {
                tracing::warn!(
                    event = "core.gateway.unexpected_status",
                    status = status
                );
                FetchOutcome::ProtocolError
            }
        }
    }
}
